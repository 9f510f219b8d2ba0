use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{write_eclipse_kernel, ECLIPSE_DATE};
use penumbra::{
    CalendarDate, EclipseRequest, GeoLocation, GeometryEngine, JPLEphem, Penumbra, PenumbraConfig,
    TimeGrid,
};

/// Full-day separation series, serial per-instant loop against the parallel batch.
fn bench_separation_series(c: &mut Criterion) {
    let (_dir, path) = write_eclipse_kernel(0.0);
    let config = PenumbraConfig::new(path.as_str()).unwrap();
    let ephem = JPLEphem::new(&config.ephemeris).unwrap();
    let grid = TimeGrid::from_date_str(ECLIPSE_DATE).unwrap();
    let site = GeoLocation::new(32.9, -96.8, 150.0).unwrap();

    let mut group = c.benchmark_group("separation_series");
    group.throughput(Throughput::Elements(grid.len() as u64));

    for aberration in [false, true] {
        let engine = GeometryEngine::new(&ephem).with_aberration(aberration);

        group.bench_with_input(
            BenchmarkId::new("batch", aberration),
            &engine,
            |b, engine| b.iter(|| black_box(engine.observe(black_box(&site), &grid).unwrap())),
        );

        group.bench_with_input(
            BenchmarkId::new("per_instant", aberration),
            &engine,
            |b, engine| {
                b.iter(|| {
                    grid.iter()
                        .map(|instant| engine.observe_instant(&site, instant).unwrap().separation)
                        .collect::<Vec<_>>()
                })
            },
        );
    }
    group.finish();
}

/// One request end to end: parsing, grid, geometry, phases and response.
fn bench_eclipse_request(c: &mut Criterion) {
    let (_dir, path) = write_eclipse_kernel(0.0);
    let penumbra = Penumbra::new(&PenumbraConfig::new(path.as_str()).unwrap()).unwrap();
    let site = GeoLocation::from_degrees(0.0, 0.0).unwrap();
    let date = CalendarDate::parse(ECLIPSE_DATE).unwrap();

    c.bench_function("eclipse_circumstances", |b| {
        b.iter(|| black_box(penumbra.eclipse_circumstances(&site, date).unwrap()))
    });

    let request = EclipseRequest::new(0.0, 0.0, ECLIPSE_DATE);
    c.bench_function("handle_request/to_json", |b| {
        b.iter(|| {
            let response = penumbra.handle_request(black_box(&request));
            black_box(response.to_json().unwrap())
        })
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench_separation_series, bench_eclipse_request
);
criterion_main!(benches);
