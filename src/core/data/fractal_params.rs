use crate::core::data::complex::Complex;
use crate::core::fractals::fractal_family::FractalFamily;
use std::error::Error;
use std::fmt;

pub const DEFAULT_JULIA_CONSTANT: Complex = Complex::new(-0.7, 0.27015);

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FractalParametersError {
    ZeroMaxIterations,
    InvalidScale { scale: f64 },
}

impl fmt::Display for FractalParametersError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMaxIterations => {
                write!(f, "Maximum iterations must be greater than zero")
            }
            Self::InvalidScale { scale } => {
                write!(f, "scale must be finite and greater than zero, got {}", scale)
            }
        }
    }
}

impl Error for FractalParametersError {}

/// Everything a scan needs to know about the complex plane for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FractalParameters {
    family: FractalFamily,
    center: Complex,
    scale: f64,
    max_iterations: u32,
    julia_constant: Complex,
}

fn validate_scale(scale: f64) -> Result<f64, FractalParametersError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(FractalParametersError::InvalidScale { scale });
    }

    Ok(scale)
}

impl FractalParameters {
    pub fn new(
        family: FractalFamily,
        center: Complex,
        scale: f64,
        max_iterations: u32,
        julia_constant: Complex,
    ) -> Result<Self, FractalParametersError> {
        if max_iterations == 0 {
            return Err(FractalParametersError::ZeroMaxIterations);
        }

        Ok(Self {
            family,
            center,
            scale: validate_scale(scale)?,
            max_iterations,
            julia_constant,
        })
    }

    #[must_use]
    pub fn family(&self) -> FractalFamily {
        self.family
    }

    #[must_use]
    pub fn center(&self) -> Complex {
        self.center
    }

    /// Width/height span of the plane across the shorter image side.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    #[must_use]
    pub fn julia_constant(&self) -> Complex {
        self.julia_constant
    }

    pub fn set_family(&mut self, family: FractalFamily) {
        self.family = family;
    }

    pub fn set_center(&mut self, center: Complex) {
        self.center = center;
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<(), FractalParametersError> {
        self.scale = validate_scale(scale)?;
        Ok(())
    }

    pub fn set_max_iterations(&mut self, max_iterations: u32) -> Result<(), FractalParametersError> {
        if max_iterations == 0 {
            return Err(FractalParametersError::ZeroMaxIterations);
        }

        self.max_iterations = max_iterations;
        Ok(())
    }

    pub fn set_julia_constant(&mut self, julia_constant: Complex) {
        self.julia_constant = julia_constant;
    }
}

impl Default for FractalParameters {
    fn default() -> Self {
        Self {
            family: FractalFamily::Mandelbrot,
            center: FractalFamily::Mandelbrot.seed_center(),
            scale: 3.0,
            max_iterations: 300,
            julia_constant: DEFAULT_JULIA_CONSTANT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_max_iterations_rejected() {
        let result = FractalParameters::new(
            FractalFamily::Mandelbrot,
            Complex::ZERO,
            3.0,
            0,
            DEFAULT_JULIA_CONSTANT,
        );

        assert_eq!(result, Err(FractalParametersError::ZeroMaxIterations));
    }

    #[test]
    fn test_non_positive_scale_rejected() {
        let result =
            FractalParameters::new(FractalFamily::Julia, Complex::ZERO, 0.0, 10, Complex::ZERO);

        assert_eq!(
            result,
            Err(FractalParametersError::InvalidScale { scale: 0.0 })
        );
        assert!(
            FractalParameters::new(FractalFamily::Julia, Complex::ZERO, f64::NAN, 10, Complex::ZERO)
                .is_err()
        );
    }

    #[test]
    fn test_setters_preserve_invariants_on_error() {
        let mut params = FractalParameters::default();

        assert!(params.set_scale(-1.0).is_err());
        assert!(params.set_max_iterations(0).is_err());

        assert_eq!(params.scale(), 3.0);
        assert_eq!(params.max_iterations(), 300);
    }

    #[test]
    fn test_default_matches_mandelbrot_home_view() {
        let params = FractalParameters::default();

        assert_eq!(params.family(), FractalFamily::Mandelbrot);
        assert_eq!(params.center(), Complex::new(-0.5, 0.0));
        assert_eq!(params.julia_constant(), DEFAULT_JULIA_CONSTANT);
    }
}
