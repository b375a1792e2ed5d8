use crate::core::actions::generate_frame::ports::colour_map::ColourMap;
use crate::core::colour_mapping::hsv::hsv_to_colour;
use crate::core::data::colour::Colour;
use crate::core::data::complex::Complex;
use crate::core::fractals::escape::EscapeResult;
use std::f64::consts::LN_2;

pub const INSIDE_COLOUR: Colour = Colour::BLACK;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColourSettings {
    pub saturation: f64,
    pub value: f64,
    pub hue_multiplier: f64,
}

impl Default for ColourSettings {
    fn default() -> Self {
        Self {
            saturation: 0.8,
            value: 1.0,
            hue_multiplier: 3.0,
        }
    }
}

/// Continuous iteration count, `n + 1 - log2(ln |z|)`.
///
/// Falls back to the raw count when `ln |z|` is not positive, which happens
/// for orbits that stopped inside the unit circle (Newton convergence, or a
/// cap hit before escape).
#[must_use]
pub fn smooth_iterations(iterations: u32, final_orbit: Complex) -> f64 {
    let log_magnitude = final_orbit.magnitude().ln();

    if log_magnitude > 0.0 {
        let smooth = f64::from(iterations) + 1.0 - log_magnitude.ln() / LN_2;
        if smooth.is_finite() {
            return smooth;
        }
    }

    f64::from(iterations)
}

#[must_use]
pub fn colorize(
    iterations: u32,
    max_iterations: u32,
    final_orbit: Complex,
    settings: &ColourSettings,
) -> Colour {
    if iterations == max_iterations {
        return INSIDE_COLOUR;
    }

    let smooth = smooth_iterations(iterations, final_orbit);
    let hue = 360.0 * (smooth / f64::from(max_iterations) * settings.hue_multiplier);

    hsv_to_colour(hue, settings.saturation, settings.value)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SmoothHsvColourMap {
    max_iterations: u32,
    settings: ColourSettings,
}

impl SmoothHsvColourMap {
    #[must_use]
    pub fn new(max_iterations: u32, settings: ColourSettings) -> Self {
        Self {
            max_iterations,
            settings,
        }
    }
}

impl ColourMap<EscapeResult> for SmoothHsvColourMap {
    fn map(&self, value: EscapeResult) -> Colour {
        colorize(
            value.iterations,
            self.max_iterations,
            value.final_orbit,
            &self.settings,
        )
    }

    fn display_name(&self) -> &str {
        "Smooth HSV"
    }
}
