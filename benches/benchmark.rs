use criterion::{Criterion, criterion_group, criterion_main};
use ephtree::config::HierarchyConfig;
use ephtree::distance::{CostFunctions, distance};
use ephtree::hierarchy::{parse_file, parse_files};
use ephtree::matrix::MatrixBuilder;
use std::hint::black_box;

const REGRESSION_PAIRS: &[(&str, &str, &str)] = &[
    ("n50-vs-n200", "benches/fixtures/random-n50.txt", "benches/fixtures/random-n200-a.txt"),
    ("n200-vs-n200", "benches/fixtures/random-n200-a.txt", "benches/fixtures/random-n200-b.txt"),
];

const MATRIX_FILES: &[&str] = &[
    "benches/fixtures/random-n50.txt",
    "benches/fixtures/random-n200-a.txt",
    "benches/fixtures/random-n200-b.txt",
];

fn hierarchy_parsing(c: &mut Criterion) {
    let config = HierarchyConfig::default();
    c.bench_function("parse-n200", |b| {
        b.iter(|| parse_file(black_box("benches/fixtures/random-n200-a.txt"), &config).unwrap());
    });
}

fn edit_distance(c: &mut Criterion) {
    let config = HierarchyConfig::default().with_scale(1000);
    let costs = CostFunctions::canonical();
    for (name, first, second) in REGRESSION_PAIRS {
        let first = parse_file(first, &config).unwrap();
        let second = parse_file(second, &config).unwrap();
        c.bench_function(name, |b| {
            b.iter(|| distance(black_box(&first), black_box(&second), &costs));
        });
    }
}

fn matrix_reporting(c: &mut Criterion) {
    let config = HierarchyConfig::default().with_scale(1000);
    // Repeat the files to get a batch worth parallelising
    let paths: Vec<&str> = MATRIX_FILES.iter().cycle().take(12).copied().collect();
    let hierarchies = parse_files(&paths, &config).unwrap();

    for (name, threshold) in [("matrix-serial", usize::MAX), ("matrix-parallel", 0)] {
        let builder = MatrixBuilder::new(CostFunctions::canonical()).with_parallel_threshold(threshold);
        c.bench_function(name, |b| {
            b.iter(|| builder.build(black_box(&hierarchies)).unwrap());
        });
    }
}

criterion_group!(regression, hierarchy_parsing, edit_distance);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = matrix_reporting
}
criterion_main!(regression, reporting);
