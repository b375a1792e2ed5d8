use crate::core::data::complex::Complex;
use crate::core::fractals::escape::EscapeResult;

pub trait FractalAlgorithm {
    fn max_iterations(&self) -> u32;

    fn compute(&self, point: Complex) -> EscapeResult;
}
