use crate::core::data::complex::Complex;
use crate::core::data::fractal_params::FractalParameters;
use std::error::Error;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ViewportError {
    ZeroSize { width: u32, height: u32 },
    InvalidScale { scale: f64 },
}

impl fmt::Display for ViewportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSize { width, height } => {
                write!(f, "viewport must have a positive size, got {}x{}", width, height)
            }
            Self::InvalidScale { scale } => {
                write!(f, "viewport scale must be finite and positive, got {}", scale)
            }
        }
    }
}

impl Error for ViewportError {}

/// Pixel to complex-plane mapping for one image size, fixed for a whole scan.
///
/// One pixel spans `scale / min(width, height)` plane units. The top-left
/// corner sits at `center.real - scale * width / height / 2` and
/// `center.imag - scale / 2`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    plane_scale: f64,
    offset: Complex,
}

impl Viewport {
    pub fn new(width: u32, height: u32, center: Complex, scale: f64) -> Result<Self, ViewportError> {
        if width == 0 || height == 0 {
            return Err(ViewportError::ZeroSize { width, height });
        }

        if !scale.is_finite() || scale <= 0.0 {
            return Err(ViewportError::InvalidScale { scale });
        }

        let (w, h) = (f64::from(width), f64::from(height));

        Ok(Self {
            width,
            height,
            plane_scale: scale / w.min(h),
            offset: Complex::new(center.real - (scale * w / h) / 2.0, center.imag - scale / 2.0),
        })
    }

    pub fn for_params(
        width: u32,
        height: u32,
        params: &FractalParameters,
    ) -> Result<Self, ViewportError> {
        Self::new(width, height, params.center(), params.scale())
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn plane_scale(&self) -> f64 {
        self.plane_scale
    }

    /// Accepts fractional and out-of-image coordinates.
    #[must_use]
    pub fn pixel_to_plane(&self, px: f64, py: f64) -> Complex {
        Complex::new(
            px * self.plane_scale + self.offset.real,
            py * self.plane_scale + self.offset.imag,
        )
    }

    #[must_use]
    pub fn plane_to_pixel(&self, point: Complex) -> (f64, f64) {
        (
            (point.real - self.offset.real) / self.plane_scale,
            (point.imag - self.offset.imag) / self.plane_scale,
        )
    }
}
