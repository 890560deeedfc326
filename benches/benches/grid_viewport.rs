// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_grid_viewport::{DimensionIndex, GridAxis, ViewportWindow};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_range_usize(&mut self, upper_exclusive: usize) -> usize {
        if upper_exclusive == 0 {
            return 0;
        }
        (self.next_u32() as usize) % upper_exclusive
    }
}

fn rows_with_overrides(count: usize, overrides: usize, seed: u64) -> DimensionIndex<f64> {
    let mut rng = Lcg::new(seed);
    let sizes: Vec<(usize, f64)> = (0..overrides)
        .map(|_| (rng.gen_range_usize(count), 20.0 + f64::from(rng.next_u32() % 80)))
        .collect();
    DimensionIndex::new(24.0).with_count(count).apply_size_overrides(sizes)
}

fn bench_size_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("dimension_index");

    for &overrides in &[0_usize, 1_000, 100_000] {
        let rows = rows_with_overrides(1_000_000, overrides, 0x5EED_0000_0000_0001);
        let total = rows.real_size();

        group.bench_function(format!("item_at_position(anchors={overrides})"), |b| {
            let mut rng = Lcg::new(0x5EED_0000_0000_0002);
            b.iter(|| {
                let pos = total * f64::from(rng.next_u32()) / f64::from(u32::MAX);
                black_box(rows.item_at_position(pos));
            });
        });

        group.bench_function(format!("apply_size_overrides_batch(anchors={overrides})"), |b| {
            let mut rng = Lcg::new(0x5EED_0000_0000_0003);
            b.iter_batched(
                || {
                    (0..64)
                        .map(|_| (rng.gen_range_usize(1_000_000), 48.0))
                        .collect::<Vec<_>>()
                },
                |batch| black_box(rows.apply_size_overrides(batch)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport_window");
    let rows = rows_with_overrides(1_000_000, 10_000, 0x5EED_0000_0000_0004);

    // Wheel-sized steps stay on the recombination path.
    group.bench_function("smooth_scroll", |b| {
        let mut window = ViewportWindow::new(900.0, rows.count()).with_frame_offset(4);
        let mut pos = 0.0;
        b.iter(|| {
            pos = (pos + 37.0) % 1_000_000.0;
            black_box(window.recompute(pos, &rows, false));
        });
    });

    group.bench_function("jump_scroll", |b| {
        let mut window = ViewportWindow::new(900.0, rows.count()).with_frame_offset(4);
        let mut rng = Lcg::new(0x5EED_0000_0000_0005);
        let total = rows.real_size();
        b.iter(|| {
            let pos = total * f64::from(rng.next_u32()) / f64::from(u32::MAX);
            black_box(window.recompute(pos, &rows, false));
        });
    });

    group.bench_function("apply_sizes", |b| {
        let mut window = ViewportWindow::new(900.0, rows.count());
        window.recompute(48_000.0, &rows, false);
        b.iter(|| {
            window.apply_sizes(&rows);
            black_box(window.len());
        });
    });

    group.finish();
}

fn bench_grid_axis(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_axis");

    group.bench_function("remove_items(n=1000)", |b| {
        b.iter_batched(
            || {
                let mut axis = GridAxis::new(100_000, 24.0_f64, 900.0);
                axis.set_sizes((0..100_000).step_by(7).map(|i| (i, 30.0)));
                axis
            },
            |mut axis| {
                axis.remove_items((0..100_000).step_by(100));
                black_box(axis.content_extent());
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_size_index, bench_window, bench_grid_axis);
criterion_main!(benches);
