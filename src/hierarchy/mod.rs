//! Reader and writer for the extended persistence hierarchy text format.
//!
//! This module provides [`HierarchyParser`] to turn line-oriented hierarchy
//! descriptions into validated [`Hierarchy`] values, and writer functions for
//! the reverse direction.
//!
//! # Quick API
//! For simple use cases:
//! * [`parse_str`] - parses a single string
//! * [`parse_file`] - parses a single file, naming the hierarchy after its path
//! * [`parse_files`] - parses many files in parallel, failing on the first bad input
//! * [`to_text`] / [`write_file`] - serialise a hierarchy
//!
//! # Format
//! One declaration per line:
//! * `<id>: <creator> <destroyer>` - node; `destroyer` may be `inf`
//! * `<idA> -- <idB>` - `idA` is the parent of `idB`
//!
//! Furthermore:
//! * Ids are unsigned integers, values are decimal numbers
//! * Whitespace around `:` and `--` is optional
//! * Edge order determines child order
//! * Lines matching neither form are ignored

mod defs;
mod parser;
pub mod writer;

pub use self::parser::HierarchyParser;
pub use self::writer::{to_text, write_file, write_hierarchy};

use crate::config::HierarchyConfig;
use crate::error::Error;
use crate::model::Hierarchy;
use crate::parser::ParsingError;
use rayon::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single hierarchy from a string.
///
/// # Arguments
/// * `text` - Hierarchy description, one declaration per line
/// * `config` - Normalisation applied to every label
///
/// # Example
/// ```
/// use ephtree::config::HierarchyConfig;
/// use ephtree::hierarchy::parse_str;
///
/// let text = "1:5 5\n2:4 3\n3:5 2\n1--2\n1--3\n";
/// let hierarchy = parse_str(text, &HierarchyConfig::default()).unwrap();
/// let children: Vec<u64> = hierarchy
///     .children(hierarchy.root_index())
///     .iter()
///     .map(|&c| hierarchy[c].id())
///     .collect();
/// assert_eq!(hierarchy.root().id(), 1);
/// assert_eq!(children, vec![2, 3]);
/// ```
pub fn parse_str<S: AsRef<str>>(text: S, config: &HierarchyConfig) -> Result<Hierarchy, ParsingError> {
    HierarchyParser::new().with_config(*config).parse_str(text.as_ref())
}

/// Parses a single hierarchy file. The hierarchy is named after `path`.
///
/// # Returns
/// * [`Hierarchy`] - parsed and validated hierarchy
/// * [`ParsingError`] - if the file cannot be read or is malformed
pub fn parse_file<P: AsRef<Path>>(path: P, config: &HierarchyConfig) -> Result<Hierarchy, ParsingError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    HierarchyParser::new()
        .with_config(*config)
        .with_name(path.display().to_string())
        .parse_reader(file)
}

/// Parses several hierarchy files in parallel, keeping input order.
///
/// Either all files parse, or the error of the first failing file (in input
/// order) is returned. The configuration is validated before any file is read.
///
/// # Errors
/// * [`Error::Config`] - `config` is invalid
/// * [`Error::Input`] - a file is unreadable or malformed
pub fn parse_files<P: AsRef<Path> + Sync>(paths: &[P], config: &HierarchyConfig) -> Result<Vec<Hierarchy>, Error> {
    config.validate()?;
    debug!(files = paths.len(), "parsing hierarchy files");

    let results: Vec<Result<Hierarchy, ParsingError>> = paths
        .par_iter()
        .map(|path| parse_file(path, config))
        .collect();

    results
        .into_iter()
        .zip(paths)
        .map(|(result, path)| result.map_err(|source| Error::input(path, source)))
        .collect()
}
