use crate::core::data::complex::Complex;
use crate::core::fractals::escape::{EscapeResult, escape_time};

/// `z ← z² + c`, starting from zero.
#[must_use]
pub fn escape(c: Complex, max_iterations: u32) -> EscapeResult {
    escape_time(Complex::ZERO, max_iterations, |z| z.square() + c)
}
