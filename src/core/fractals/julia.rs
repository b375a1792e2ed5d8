use crate::core::data::complex::Complex;
use crate::core::fractals::escape::{EscapeResult, escape_time};

/// `z ← z² + k` for a fixed `k`, seeded with the point itself.
#[must_use]
pub fn escape(point: Complex, constant: Complex, max_iterations: u32) -> EscapeResult {
    escape_time(point, max_iterations, |z| z.square() + constant)
}
