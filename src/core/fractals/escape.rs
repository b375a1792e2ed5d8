use crate::core::actions::generate_frame::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::data::complex::Complex;
use crate::core::data::fractal_params::FractalParameters;
use crate::core::fractals::fractal_family::FractalFamily;
use crate::core::fractals::{burning_ship, julia, mandelbrot, newton, tricorn};
use std::ops::ControlFlow;

pub const ESCAPE_RADIUS_SQUARED: f64 = 4.0;

/// Iteration count reached and the last orbit value.
///
/// `iterations == max_iterations` means "never escaped" for the quadratic
/// families only; Newton also stops early on convergence.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EscapeResult {
    pub iterations: u32,
    pub final_orbit: Complex,
}

pub(crate) fn escape_time(
    seed: Complex,
    max_iterations: u32,
    step: impl Fn(Complex) -> Complex,
) -> EscapeResult {
    let outcome = (0..max_iterations).try_fold(seed, |z, iteration| {
        if z.magnitude_squared() > ESCAPE_RADIUS_SQUARED {
            ControlFlow::Break((iteration, z))
        } else {
            ControlFlow::Continue(step(z))
        }
    });

    match outcome {
        ControlFlow::Break((iterations, final_orbit)) => EscapeResult {
            iterations,
            final_orbit,
        },
        ControlFlow::Continue(final_orbit) => EscapeResult {
            iterations: max_iterations,
            final_orbit,
        },
    }
}

/// Runs one family's recurrence for the plane point `(x0, y0)`.
#[must_use]
pub fn evaluate(
    family: FractalFamily,
    x0: f64,
    y0: f64,
    max_iterations: u32,
    julia_constant: Complex,
) -> EscapeResult {
    let point = Complex::new(x0, y0);

    match family {
        FractalFamily::Mandelbrot => mandelbrot::escape(point, max_iterations),
        FractalFamily::Julia => julia::escape(point, julia_constant, max_iterations),
        FractalFamily::BurningShip => burning_ship::escape(point, max_iterations),
        FractalFamily::Tricorn => tricorn::escape(point, max_iterations),
        FractalFamily::Newton => newton::escape(point, max_iterations),
    }
}

/// [`evaluate`] bound to the parameters of a single frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EscapeEvaluator {
    family: FractalFamily,
    max_iterations: u32,
    julia_constant: Complex,
}

impl EscapeEvaluator {
    #[must_use]
    pub fn new(params: &FractalParameters) -> Self {
        Self {
            family: params.family(),
            max_iterations: params.max_iterations(),
            julia_constant: params.julia_constant(),
        }
    }
}

impl FractalAlgorithm for EscapeEvaluator {
    fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    fn compute(&self, point: Complex) -> EscapeResult {
        evaluate(
            self.family,
            point.real,
            point.imag,
            self.max_iterations,
            self.julia_constant,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::fractal_params::DEFAULT_JULIA_CONSTANT;

    #[test]
    fn evaluate_is_deterministic_for_every_family() {
        let samples = [(-0.75, 0.1), (0.3, -0.5), (1.2, 0.8), (-1.8, -0.02)];

        for &family in FractalFamily::ALL {
            for &(x, y) in &samples {
                let first = evaluate(family, x, y, 200, DEFAULT_JULIA_CONSTANT);
                let second = evaluate(family, x, y, 200, DEFAULT_JULIA_CONSTANT);

                assert_eq!(first.iterations, second.iterations, "{family} at ({x}, {y})");
                assert_eq!(
                    first.final_orbit.real.to_bits(),
                    second.final_orbit.real.to_bits()
                );
                assert_eq!(
                    first.final_orbit.imag.to_bits(),
                    second.final_orbit.imag.to_bits()
                );
            }
        }
    }

    #[test]
    fn iterations_never_exceed_cap() {
        for &family in FractalFamily::ALL {
            for max in [1, 2, 17, 256] {
                let result = evaluate(family, 0.1, 0.1, max, DEFAULT_JULIA_CONSTANT);
                assert!(result.iterations <= max, "{family} exceeded cap {max}");
            }
        }
    }

    #[test]
    fn escape_time_stops_at_first_orbit_outside_radius() {
        let result = escape_time(Complex::new(3.0, 0.0), 10, |z| z);

        assert_eq!(result.iterations, 0);
        assert_eq!(result.final_orbit, Complex::new(3.0, 0.0));
    }

    #[test]
    fn escape_time_reports_cap_when_bounded() {
        let result = escape_time(Complex::ZERO, 25, |z| z);

        assert_eq!(result.iterations, 25);
        assert_eq!(result.final_orbit, Complex::ZERO);
    }

    #[test]
    fn evaluator_binds_frame_parameters() {
        let params = FractalParameters::new(
            FractalFamily::Julia,
            Complex::ZERO,
            3.0,
            64,
            DEFAULT_JULIA_CONSTANT,
        )
        .unwrap();
        let evaluator = EscapeEvaluator::new(&params);

        assert_eq!(evaluator.max_iterations(), 64);
        assert_eq!(
            evaluator.compute(Complex::new(0.2, 0.1)),
            evaluate(FractalFamily::Julia, 0.2, 0.1, 64, DEFAULT_JULIA_CONSTANT)
        );
    }
}
