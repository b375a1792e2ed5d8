//! Escape-time evaluation and full-frame scan throughput.
//!
//! Run with:
//! `cargo bench --bench scan_pipeline`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fractal_scanner::core::actions::cancellation::NeverCancel;
use fractal_scanner::core::actions::generate_frame::generate_frame::generate_frame;
use fractal_scanner::core::colour_mapping::smooth_hsv::ColourSettings;
use fractal_scanner::core::data::complex::Complex;
use fractal_scanner::core::data::fractal_params::{DEFAULT_JULIA_CONSTANT, FractalParameters};
use fractal_scanner::core::fractals::escape::evaluate;
use fractal_scanner::core::fractals::fractal_family::FractalFamily;
use std::hint::black_box;

const SAMPLES: usize = 1_000;
const MAX_ITERATIONS: u32 = 300;

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate/1k_points");
    group.throughput(Throughput::Elements(SAMPLES as u64));

    for &family in FractalFamily::ALL {
        group.bench_function(BenchmarkId::from_parameter(family.display_name()), |b| {
            b.iter(|| {
                for i in 0..SAMPLES {
                    let t = i as f64 / SAMPLES as f64;
                    let result = evaluate(
                        family,
                        black_box(-2.0 + 3.0 * t),
                        black_box(-1.0 + 2.0 * t),
                        MAX_ITERATIONS,
                        DEFAULT_JULIA_CONSTANT,
                    );
                    black_box(result);
                }
            });
        });
    }

    group.finish();
}

fn bench_full_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan/full_frame");
    group.sample_size(10);

    for &(width, height) in &[(160_u32, 90_u32), (640, 360)] {
        let params = FractalParameters::new(
            FractalFamily::Mandelbrot,
            Complex::new(-0.5, 0.0),
            3.0,
            MAX_ITERATIONS,
            DEFAULT_JULIA_CONSTANT,
        )
        .unwrap();

        group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));
        group.bench_function(BenchmarkId::new("mandelbrot", format!("{width}x{height}")), |b| {
            b.iter(|| {
                let frame = generate_frame(&params, width, height, ColourSettings::default(), &NeverCancel)
                    .unwrap();
                black_box(frame);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_full_frame);
criterion_main!(benches);
