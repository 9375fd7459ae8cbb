//! Constants for reading and writing the hierarchy text format.

/// Separates a node id from its persistence pair: `<id>: <creator> <destroyer>`
pub(crate) const NODE_SEPARATOR: u8 = b':';

/// Separates parent and child ids: `<parent> -- <child>`
pub(crate) const EDGE_SEPARATOR: &[u8] = b"--";

/// Spellings of an infinite destroyer (compared case-insensitively, optional leading `+`)
pub(crate) const INFINITY_TOKENS: &[&str] = &["inf", "infty", "infinity"];

/// Rough number of bytes per line, used to size writer buffers
pub(crate) const BYTES_PER_LINE_GUESS: usize = 24;
