use ephtree::config::HierarchyConfig;
use ephtree::distance::{canonical_relabel, distance, persistence_cost, CostFunctions};
use ephtree::hierarchy::parse_str;
use ephtree::matrix::{build_matrix, write_matrix, write_matrix_file, BatchConfig, CancelToken, MatrixBuilder};
use ephtree::model::{Hierarchy, Label};
use ephtree::{compare_files, Error};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn fixture(name: &str) -> PathBuf {
    Path::new("tests").join("fixtures").join(name)
}

fn hierarchies() -> Vec<Hierarchy> {
    let config = HierarchyConfig::default();
    ["1: 0 10", "1: 0 0", "1: 0 10\n2: 0 5\n1 -- 2"]
        .iter()
        .map(|text| parse_str(text, &config).unwrap())
        .collect()
}

/// Chains and stars of growing size with distinct labels.
fn many_hierarchies(n: u64) -> Vec<Hierarchy> {
    let config = HierarchyConfig::default();
    (0..n)
        .map(|k| {
            let mut text = String::new();
            for id in 0..=k % 5 + 1 {
                text.push_str(&format!("{id}: {} {}\n", id, id * 3 + k));
            }
            for id in 1..=k % 5 + 1 {
                let parent = if k % 2 == 0 { 0 } else { id - 1 };
                text.push_str(&format!("{parent} -- {id}\n"));
            }
            parse_str(&text, &config).unwrap()
        })
        .collect()
}

#[test]
fn test_three_hierarchies() {
    let matrix = build_matrix(&hierarchies(), &CostFunctions::canonical());

    assert_eq!(matrix.size(), 3);
    for i in 0..3 {
        assert_eq!(matrix.get(i, i), 0.0);
    }
    assert_eq!(matrix.get(0, 1), matrix.get(1, 0));
    assert_eq!(matrix.get(0, 2), matrix.get(2, 0));
    assert_eq!(matrix.get(1, 2), matrix.get(2, 1));
    assert_eq!(matrix.row(0), &[0.0, 10.0, 5.0]);
    assert!(matrix.is_symmetric());
}

#[test]
fn test_cells_match_pairwise_distance() {
    let hierarchies = many_hierarchies(9);
    let costs = CostFunctions::canonical();
    let matrix = build_matrix(&hierarchies, &costs);
    for i in 0..hierarchies.len() {
        for j in 0..hierarchies.len() {
            if i != j {
                let expected = distance(&hierarchies[i.min(j)], &hierarchies[i.max(j)], &costs);
                assert_eq!(matrix.get(i, j), expected);
            }
        }
    }
}

#[test]
fn test_parallel_matches_serial() {
    let hierarchies = many_hierarchies(20);
    let costs = CostFunctions::canonical();

    let serial = MatrixBuilder::new(costs)
        .with_parallel_threshold(usize::MAX)
        .build(&hierarchies)
        .unwrap();
    let parallel = MatrixBuilder::new(costs)
        .with_parallel_threshold(0)
        .build(&hierarchies)
        .unwrap();
    let bounded = MatrixBuilder::new(costs)
        .with_config(BatchConfig {
            parallel_threshold: 1,
            max_threads: Some(2),
        })
        .build(&hierarchies)
        .unwrap();

    assert_eq!(serial, parallel);
    assert_eq!(serial, bounded);
    assert_eq!(serial, build_matrix(&hierarchies, &costs));
}

#[test]
fn test_cancelled_batch() {
    let hierarchies = many_hierarchies(6);
    let token = CancelToken::new();
    token.cancel();

    let builder = MatrixBuilder::default().with_cancel_token(token.clone());
    let cancelled = builder.build(&hierarchies).unwrap_err();
    assert!(cancelled.completed.is_empty());
    assert_eq!(cancelled.total, 15);

    // Hierarchies stay usable
    let matrix = MatrixBuilder::default().build(&hierarchies).unwrap();
    assert_eq!(matrix.size(), 6);
}

static MID_BATCH_TOKEN: OnceLock<CancelToken> = OnceLock::new();

/// Canonical relabel cost that cancels the batch on its first use.
fn cancelling_relabel(a: &Label, b: &Label) -> f64 {
    if let Some(token) = MID_BATCH_TOKEN.get() {
        token.cancel();
    }
    canonical_relabel(a, b)
}

#[test]
fn test_cancelled_mid_batch() {
    let hierarchies = many_hierarchies(4);
    let token = MID_BATCH_TOKEN.get_or_init(CancelToken::new).clone();
    let costs = CostFunctions::new(cancelling_relabel, persistence_cost, persistence_cost);

    // Serial, so the running pair finishes and all later ones are skipped
    let cancelled = MatrixBuilder::new(costs)
        .with_parallel_threshold(usize::MAX)
        .with_cancel_token(token.clone())
        .build(&hierarchies)
        .unwrap_err();

    assert!(token.is_cancelled());
    assert_eq!(cancelled.completed, vec![(0, 1)]);
    assert_eq!(cancelled.total, 6);
}

#[test]
fn test_uncancelled_token() {
    let token = CancelToken::new();
    let matrix = MatrixBuilder::default()
        .with_cancel_token(token)
        .build(&hierarchies())
        .unwrap();
    assert_eq!(matrix.get(1, 2), 15.0);
}

#[test]
fn test_single_and_empty_batch() {
    let costs = CostFunctions::canonical();
    assert!(build_matrix(&[], &costs).is_empty());

    let single = build_matrix(&hierarchies()[..1], &costs);
    assert_eq!(single.as_slice(), &[0.0]);
}

// --- TESTS OUTPUT ---
#[test]
fn test_write_matrix() {
    let matrix = build_matrix(&hierarchies(), &CostFunctions::canonical());
    let mut out = Vec::new();
    write_matrix(&mut out, &matrix).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "0 10 5\n10 0 15\n5 15 0\n");
}

#[test]
fn test_write_matrix_file() {
    let matrix = build_matrix(&hierarchies(), &CostFunctions::canonical());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matrix.txt");
    write_matrix_file(&path, &matrix).unwrap();

    let rows: Vec<Vec<f64>> = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|line| line.split_whitespace().map(|v| v.parse().unwrap()).collect())
        .collect();
    let expected: Vec<Vec<f64>> = matrix.rows().map(|row| row.to_vec()).collect();
    assert_eq!(rows, expected);
}

// --- TESTS FILE COMPARISON ---
#[test]
fn test_compare_files_reports_duplicates() {
    let paths = [fixture("simple.txt"), fixture("essential.txt"), fixture("simple_renumbered.txt")];
    let matrix = compare_files(&paths, &HierarchyConfig::default(), &CostFunctions::canonical()).unwrap();

    assert_eq!(matrix.size(), 3);
    assert_eq!(matrix.get(0, 2), 0.0);
    assert!(matrix.get(0, 1) > 0.0);
    assert_eq!(matrix.duplicate_classes(), vec![vec![0, 2]]);
}

#[test]
fn test_compare_files_fails_fast() {
    let paths = [fixture("simple.txt"), fixture("two_roots.txt")];
    let err = compare_files(&paths, &HierarchyConfig::default(), &CostFunctions::canonical()).unwrap_err();
    assert!(matches!(&err, Error::Input { source, .. } if source.is_malformed()));
    assert_eq!(err.path(), Some(fixture("two_roots.txt").as_path()));
}
