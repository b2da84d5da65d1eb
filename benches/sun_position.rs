use chrono::{DateTime, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use solar_positioning::spa;
use std::hint::black_box;
use sunpos::sun_position;

fn benchmark_single_calculation(c: &mut Criterion) {
    let datetime = "2023-06-21T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
    let millis = datetime.timestamp_millis() as f64;
    let lat = 37.7749;
    let lon = -122.4194;

    c.bench_function("sunpos_single", |b| {
        b.iter(|| sun_position(black_box(millis), black_box(lat), black_box(lon)))
    });

    c.bench_function("spa_single", |b| {
        b.iter(|| {
            spa::solar_position(
                black_box(datetime),
                black_box(lat),
                black_box(lon),
                black_box(0.0),
                black_box(69.0),
                black_box(None),
            )
            .unwrap()
        })
    });
}

fn benchmark_coordinate_sweep(c: &mut Criterion) {
    let millis = "2024-03-20T00:00:00Z"
        .parse::<DateTime<Utc>>()
        .unwrap()
        .timestamp_millis() as f64;

    let mut group = c.benchmark_group("coordinate_sweep_fixed_time");
    for step in [10.0, 5.0, 1.0] {
        let lats: Vec<f64> = (0..)
            .map(|i| -90.0 + i as f64 * step)
            .take_while(|&v| v <= 90.0)
            .collect();
        let lons: Vec<f64> = (0..)
            .map(|i| -180.0 + i as f64 * step)
            .take_while(|&v| v <= 180.0)
            .collect();

        group.throughput(Throughput::Elements((lats.len() * lons.len()) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(step), &step, |b, _| {
            b.iter(|| {
                let mut acc = 0.0;
                for &lat in &lats {
                    for &lon in &lons {
                        acc += sun_position(black_box(millis), lat, lon).altitude();
                    }
                }
                acc
            })
        });
    }
    group.finish();
}

fn benchmark_time_series(c: &mut Criterion) {
    let start = "2024-01-01T00:00:00Z"
        .parse::<DateTime<Utc>>()
        .unwrap()
        .timestamp_millis() as f64;
    let days: u64 = 365;

    let mut group = c.benchmark_group("time_series_fixed_location");
    group.throughput(Throughput::Elements(days));
    group.bench_function("daily_midnights", |b| {
        b.iter(|| {
            (0..days)
                .map(|d| sun_position(black_box(start + d as f64 * 86_400_000.0), 52.0, 13.4))
                .map(|p| p.azimuth())
                .sum::<f64>()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_calculation,
    benchmark_coordinate_sweep,
    benchmark_time_series
);
criterion_main!(benches);
