//! Matrix output: one row per line, values separated by single spaces.
//!
//! Values use the shortest representation that parses back to the same `f64`.

use crate::matrix::DistanceMatrix;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes `matrix` row by row to `writer`.
pub fn write_matrix<W: Write>(writer: &mut W, matrix: &DistanceMatrix) -> io::Result<()> {
    write!(writer, "{matrix}")
}

/// Writes `matrix` to the file at `path`, replacing its content.
///
/// # Errors
/// Returns an I/O error if the file cannot be created or written.
pub fn write_matrix_file<P: AsRef<Path>>(path: P, matrix: &DistanceMatrix) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_matrix(&mut writer, matrix)?;
    writer.flush()
}
