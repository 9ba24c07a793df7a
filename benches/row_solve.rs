//! Performance measurement for the horoptic row solver at varying widths

// Criterion macros generate undocumented functions
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use stereogrammer::algorithm::horoptic::{HoropticParams, HoropticRows};

/// Measures the constraint solve for one row, with and without the
/// hidden-surface walk
fn bench_solve_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_row");

    for &line_width in &[1024usize, 2048, 4096] {
        let depth_line: Vec<f32> = (0..line_width)
            .map(|i| ((i * 13) % 256) as f32 / 255.0)
            .collect();

        for remove_hidden_surfaces in [false, true] {
            let rows = HoropticRows::new(HoropticParams {
                line_width,
                midpoint: line_width / 2,
                separation: 128.0,
                field_depth: 0.3333,
                remove_hidden_surfaces,
            });

            let label = if remove_hidden_surfaces {
                format!("{line_width}_hidden")
            } else {
                format!("{line_width}")
            };

            group.bench_with_input(
                BenchmarkId::from_parameter(label),
                &depth_line,
                |b, depth_line| {
                    b.iter(|| {
                        let solved = rows.solve_row(black_box(depth_line));
                        black_box(solved.ok());
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_solve_row);
criterion_main!(benches);
