#![allow(clippy::all)] // Clippy will attempt to remove black_box() internals

use criterion::*;
use gridfield::utils::{linspace, tabulate};
use gridfield::{AxisSet, Diffusivity, FieldSampler, SamplerConfig, TimeSeries};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build a time-varying sampler on a `gridsize`^ndims grid with `nslices` slices.
fn gen_sampler(ndims: usize, gridsize: usize, nslices: usize) -> FieldSampler {
    let x = linspace(0.0, 1000.0, gridsize);
    let y = linspace(0.0, 1000.0, gridsize);
    let z = (ndims == 3).then(|| linspace(0.0, 500.0, gridsize));
    let t = linspace(0.0, 3600.0 * (nslices - 1) as f64, nslices);
    let axes = AxisSet::new(x, y, z, Some(t)).unwrap();

    let components = (0..ndims)
        .map(|c| {
            (0..nslices)
                .map(|s| tabulate(&axes, |p| (c + s) as f64 * 1e-3 * (p[0] + 2.0 * p[1] - p[2])))
                .collect()
        })
        .collect();
    let series = TimeSeries::new(components, &axes).unwrap();

    let mut config = SamplerConfig::new(ndims, Diffusivity::Scalar(1.0));
    config.time_dependent = true;
    FieldSampler::from_grid(config, axes, series).unwrap()
}

/// Random observation points covering the grid plus a margin outside it.
fn gen_points(n: usize) -> Vec<[f64; 3]> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..n)
        .map(|_| {
            [
                rng.gen_range(-50.0..1050.0),
                rng.gen_range(-50.0..1050.0),
                rng.gen_range(-50.0..550.0),
            ]
        })
        .collect()
}

fn bench_sample_velocity(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_velocity");
    for ndims in [2, 3] {
        for size in [100, 10_000].iter() {
            group.throughput(Throughput::Elements(*size as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{ndims}D 50^{ndims} grid"), size),
                size,
                |b, &size| {
                    let sampler = gen_sampler(ndims, 50, 4);
                    let points = gen_points(size);
                    let mut out = vec![[0.0; 3]; size];
                    b.iter(|| {
                        black_box(sampler.sample_velocity_many(&points, &mut out).unwrap())
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");
    for ndims in [2, 3] {
        group.bench_function(format!("{ndims}D rebuild every call"), |b| {
            let mut sampler = gen_sampler(ndims, 50, 24);
            let mut t = 0.0;
            b.iter(|| {
                // Step one slice forward, wrapping back to the start
                t = (t + 3600.0) % (3600.0 * 24.0);
                black_box(sampler.advance(t).unwrap())
            });
        });
        group.bench_function(format!("{ndims}D within slice"), |b| {
            let mut sampler = gen_sampler(ndims, 50, 24);
            let mut t = 0.0;
            b.iter(|| {
                t = (t + 1.0) % 3600.0;
                black_box(sampler.advance(t).unwrap())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sample_velocity, bench_advance);
criterion_main!(benches);
