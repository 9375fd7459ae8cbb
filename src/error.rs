//! Crate-level error type for operations spanning files.
//!
//! Single-input operations return the narrower [ParsingError] or
//! [ConfigError]. Batch operations over several files return [Error], which
//! names the offending file.

use crate::config::ConfigError;
use crate::parser::ParsingError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors of a comparison run over files.
#[derive(Error, Debug)]
pub enum Error {
    /// An input hierarchy could not be read or is malformed.
    #[error("Failed to read hierarchy '{path}': {source}")]
    Input {
        /// The offending input file
        path: PathBuf,
        #[source]
        source: ParsingError,
    },

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An output could not be written.
    #[error("Failed to write '{path}': {source}")]
    Output {
        /// The output file
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Wraps a parsing error with the path of the input it occurred in.
    pub fn input<P: AsRef<Path>>(path: P, source: ParsingError) -> Self {
        Error::Input {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wraps a write failure with the path of the output.
    pub fn output<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        Error::Output {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns the file the error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::Input { path, .. } | Error::Output { path, .. } => Some(path),
            Error::Config(_) => None,
        }
    }
}
