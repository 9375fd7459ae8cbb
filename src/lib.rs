//! Ephtree is a library to compare extended persistence hierarchies.
//!
//! An extended persistence hierarchy is a rooted, ordered tree of
//! critical-point pairs `(creator, destroyer)` describing how topological
//! features nest across a filtration. This crate reads such hierarchies from a
//! line-oriented text format and compares them with an ordered tree edit
//! distance.
//! Core functionality provided:
//! - Parser: Read `<id>: <creator> <destroyer>` node lines and `<idA> -- <idB>`
//!   edge lines into a validated [Hierarchy]; malformed inputs (several roots,
//!   cycles, multiple parents, undeclared ids) are rejected, never repaired.
//! - Tree model: [Hierarchy] uses the arena pattern, so no vertex stores a
//!   reference to another, only vertex indices. Postorder numbering,
//!   leftmost leaves and keyroots are computed once per hierarchy.
//! - Edit distance: Keyroot-based dynamic program under configurable
//!   [CostFunctions].
//! - Distance matrix: All pairwise distances of a batch, computed in
//!   parallel, with optional cancellation.
//! - Configurability:
//!   - Scaling of finite values (multiply and round)
//!   - Finite sentinel substituted for infinite destroyers
//!   - Thread count and serial threshold of the matrix batch
//!
//! Limitations:
//! - Node ids are unsigned integers
//! - Tie-breaking among equal-cost edit mappings is unspecified; only the
//!   distance value is guaranteed
//!
//! # Usage patterns
//! 1. The quick API below parses, compares, and builds matrices with default
//!    settings.
//! 2. Configure a [HierarchyParser](crate::hierarchy::HierarchyParser) or a
//!    [MatrixBuilder](crate::matrix::MatrixBuilder) for full control.
//!
//! ## Example
//! ```
//! use ephtree::config::HierarchyConfig;
//! use ephtree::distance::CostFunctions;
//! use ephtree::{build_matrix, distance, parse_hierarchy};
//!
//! let config = HierarchyConfig::default();
//! let a = parse_hierarchy("1: 0 10\n2: 0 5\n1 -- 2", &config).unwrap();
//! let b = parse_hierarchy("1: 0 10", &config).unwrap();
//!
//! let costs = CostFunctions::canonical();
//! assert_eq!(distance(&a, &b, &costs), 5.0);
//!
//! let matrix = build_matrix(&[a, b], &costs);
//! assert_eq!(matrix.to_string(), "0 5\n5 0\n");
//! ```

pub mod config;
pub mod distance;
pub mod error;
pub mod hierarchy;
pub mod matrix;
pub mod model;
pub mod parser;

pub use crate::config::HierarchyConfig;
pub use crate::distance::CostFunctions;
pub use crate::error::Error;
pub use crate::matrix::DistanceMatrix;
pub use crate::model::Hierarchy;

use crate::parser::parsing_error::ParsingError;
use std::path::Path;
use tracing::info;

// ============================================================================
// Quick API
// ============================================================================
/// Parses a hierarchy from text.
///
/// See [`hierarchy::parse_str`] for full documentation.
pub fn parse_hierarchy<S: AsRef<str>>(text: S, config: &HierarchyConfig) -> Result<Hierarchy, ParsingError> {
    hierarchy::parse_str(text, config)
}

/// Returns the edit distance between two hierarchies.
///
/// See [`distance::distance`] for full documentation.
pub fn distance(first: &Hierarchy, second: &Hierarchy, costs: &CostFunctions) -> f64 {
    distance::distance(first, second, costs)
}

/// Computes the symmetric pairwise distance matrix of `hierarchies`.
///
/// See [`matrix::build_matrix`] for full documentation.
pub fn build_matrix(hierarchies: &[Hierarchy], costs: &CostFunctions) -> DistanceMatrix {
    matrix::build_matrix(hierarchies, costs)
}

/// Parses all files and computes their distance matrix.
///
/// Fails fast: if any file is unreadable or malformed, no matrix is computed
/// and the first failing file in input order is reported.
///
/// # Errors
/// * [`Error::Config`] - `config` is invalid
/// * [`Error::Input`] - a file is unreadable or malformed
pub fn compare_files<P: AsRef<Path> + Sync>(
    paths: &[P],
    config: &HierarchyConfig,
    costs: &CostFunctions,
) -> Result<DistanceMatrix, Error> {
    let hierarchies = hierarchy::parse_files(paths, config)?;
    info!(hierarchies = hierarchies.len(), "parsed all hierarchies");
    Ok(build_matrix(&hierarchies, costs))
}
