use criterion::{black_box, criterion_group, criterion_main, Criterion};
use schemnet::prelude::*;
use schemnet::{extract_circuit, infer_dots, Wire};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A comb of `n` vertical teeth hanging off one horizontal spine.
fn comb(n: i64) -> Schematic {
    let mut sch = Schematic::new("comb");
    sch.wires.push(Wire::from_coords(&[(0, 0), (n * 100 + 100, 0)]));
    for i in 1..=n {
        sch.wires.push(Wire::from_coords(&[(i * 100, 0), (i * 100, 100)]));
    }
    sch
}

fn bench_extract_file(c: &mut Criterion) {
    let library = ElementLibrary::default();
    let options = ExtractOptions::default();

    c.bench_function("extract_file", |b| {
        b.iter(|| {
            SchemnetCore::extract_file(
                black_box(&fixture_path("valid/inverter.sch.json")),
                black_box(&library),
                black_box(&options),
            )
        });
    });
}

fn bench_extract_comb(c: &mut Criterion) {
    let library = ElementLibrary::default();
    let sch = comb(200);

    c.bench_function("extract_comb_200", |b| {
        b.iter(|| extract_circuit(black_box(&sch), black_box(&library)));
    });
    c.bench_function("infer_dots_comb_200", |b| {
        b.iter(|| infer_dots(black_box(&sch), black_box(&library)));
    });
}

criterion_group!(benches, bench_extract_file, bench_extract_comb);
criterion_main!(benches);
