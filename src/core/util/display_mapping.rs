use crate::core::data::view_transform::ViewTransform;
use serde::Deserialize;

/// How a finished frame is scaled into the display area before the view
/// transform applies.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Whole frame visible, letterboxed.
    #[default]
    Fit,
    /// Display covered, frame cropped.
    Fill,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Where the frame lands on screen, in screen pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DisplayRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

fn base_scale(display: Size, image: Size, fit: FitMode) -> f64 {
    let scale_x = display.width / image.width;
    let scale_y = display.height / image.height;

    match fit {
        FitMode::Fit => scale_x.min(scale_y),
        FitMode::Fill => scale_x.max(scale_y),
    }
}

#[must_use]
pub fn display_rect(display: Size, image: Size, view: &ViewTransform, fit: FitMode) -> DisplayRect {
    let scale = base_scale(display, image, fit) * view.zoom();
    let width = image.width * scale;
    let height = image.height * scale;

    DisplayRect {
        x: (display.width - width) / 2.0 + view.offset_x(),
        y: (display.height - height) / 2.0 + view.offset_y(),
        width,
        height,
    }
}

/// Screen position to (fractional) image pixel, undoing the centred
/// display scale, the view zoom and the view pan.
#[must_use]
pub fn screen_to_image(
    screen_x: f64,
    screen_y: f64,
    display: Size,
    image: Size,
    view: &ViewTransform,
    fit: FitMode,
) -> (f64, f64) {
    let rect = display_rect(display, image, view, fit);
    let scale = rect.width / image.width;

    ((screen_x - rect.x) / scale, (screen_y - rect.y) / scale)
}

#[must_use]
pub fn image_to_screen(
    image_x: f64,
    image_y: f64,
    display: Size,
    image: Size,
    view: &ViewTransform,
    fit: FitMode,
) -> (f64, f64) {
    let rect = display_rect(display, image, view, fit);
    let scale = rect.width / image.width;

    (image_x * scale + rect.x, image_y * scale + rect.y)
}
