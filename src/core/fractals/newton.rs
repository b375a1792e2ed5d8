use crate::core::data::complex::Complex;
use crate::core::fractals::escape::EscapeResult;

/// Step size below which the iteration counts as converged.
pub const NEWTON_TOLERANCE: f64 = 1e-4;

/// `|3z²|²` below this value stops the iteration before dividing.
pub const DERIVATIVE_FLOOR: f64 = 1e-4;

/// Newton's method on `z³ - 1`, seeded with the point itself.
///
/// Stops when the derivative is too small to divide by or when both
/// components of the step fall under [`NEWTON_TOLERANCE`]. The convergence
/// check runs before the iteration is counted, so a point that converges on
/// its first step reports zero iterations.
#[must_use]
pub fn escape(point: Complex, max_iterations: u32) -> EscapeResult {
    let mut z = point;
    let mut iterations = 0;

    while iterations < max_iterations {
        let z2 = z.square();
        let f = z2 * z - Complex::new(1.0, 0.0);
        let df = Complex::new(3.0 * z2.real, 3.0 * z2.imag);
        let denominator = df.magnitude_squared();

        if denominator < DERIVATIVE_FLOOR {
            break;
        }

        // f / f' = f * conj(f') / |f'|²
        let numerator = f * df.conj();
        let step = Complex::new(numerator.real / denominator, numerator.imag / denominator);
        z = z - step;

        if step.real.abs() < NEWTON_TOLERANCE && step.imag.abs() < NEWTON_TOLERANCE {
            break;
        }

        iterations += 1;
    }

    EscapeResult {
        iterations,
        final_orbit: z,
    }
}
