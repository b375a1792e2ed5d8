pub const MIN_VIEW_ZOOM: f64 = 0.1;

/// Presentation-only zoom and pan applied on top of a finished frame.
///
/// Offsets are in screen pixels. Never affects computed pixel data.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewTransform {
    zoom: f64,
    offset_x: f64,
    offset_y: f64,
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        zoom: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    /// Builds a transform, clamping the zoom to [`MIN_VIEW_ZOOM`].
    #[must_use]
    pub fn new(zoom: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            offset_x,
            offset_y,
        }
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    #[must_use]
    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom = clamp_zoom(self.zoom * factor);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.offset_x += dx;
            self.offset_y += dy;
        }
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.max(MIN_VIEW_ZOOM)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        assert!(ViewTransform::default().is_identity());
    }

    #[test]
    fn zoom_is_clamped_to_minimum() {
        let mut view = ViewTransform::IDENTITY;

        view.zoom_by(0.001);

        assert_eq!(view.zoom(), MIN_VIEW_ZOOM);
        assert_eq!(ViewTransform::new(f64::NAN, 0.0, 0.0).zoom(), 1.0);
    }

    #[test]
    fn pan_accumulates_and_ignores_non_finite() {
        let mut view = ViewTransform::IDENTITY;

        view.pan_by(10.0, -5.0);
        view.pan_by(2.5, 1.0);
        view.pan_by(f64::INFINITY, 1.0);

        assert_eq!(view.offset_x(), 12.5);
        assert_eq!(view.offset_y(), -4.0);
        assert!(!view.is_identity());
    }
}
