//! Hierarchy text writing.
//!
//! Output consists of one node line per vertex in declaration order, a blank
//! line, and one edge line per parent/child link in preorder:
//!
//! ```text
//! 1: 0	inf
//! 2: 1	3
//!
//! 1 -- 2
//! ```
//!
//! The output parses back into an equal hierarchy.

use crate::hierarchy::defs::BYTES_PER_LINE_GUESS;
use crate::model::Hierarchy;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Returns the text representation of a hierarchy.
///
/// # Example
/// ```
/// use ephtree::hierarchy::{parse_str, to_text};
/// use ephtree::config::HierarchyConfig;
///
/// let hierarchy = parse_str("2: 1 3\n1: 0 inf\n1 -- 2", &HierarchyConfig::default()).unwrap();
/// assert_eq!(to_text(&hierarchy), "2: 1\t3\n1: 0\tinf\n\n1 -- 2\n");
/// ```
pub fn to_text(hierarchy: &Hierarchy) -> String {
    let mut text = String::with_capacity(2 * hierarchy.num_vertices() * BYTES_PER_LINE_GUESS);

    for vertex in hierarchy.vertices() {
        text.push_str(&format!("{}: {}\n", vertex.id(), vertex.pair()));
    }
    text.push('\n');
    for vertex in hierarchy.pre_order_iter() {
        for &child in vertex.children() {
            text.push_str(&format!("{} -- {}\n", vertex.id(), hierarchy[child].id()));
        }
    }

    text
}

/// Writes a hierarchy in text form to `writer`.
pub fn write_hierarchy<W: Write>(writer: &mut W, hierarchy: &Hierarchy) -> io::Result<()> {
    writer.write_all(to_text(hierarchy).as_bytes())
}

/// Writes a hierarchy in text form to the file at `path`, replacing its content.
///
/// # Errors
/// Returns an I/O error if the file cannot be created or written.
pub fn write_file<P: AsRef<Path>>(path: P, hierarchy: &Hierarchy) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_hierarchy(&mut writer, hierarchy)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HierarchyBuilder, PersistencePair};

    #[test]
    fn test_edges_follow_preorder() {
        let mut builder = HierarchyBuilder::default();
        for id in [4, 3, 2, 1] {
            builder.declare_node(id, PersistencePair::finite(0.0, id as f64)).unwrap();
        }
        builder.add_edge(2, 4);
        builder.add_edge(1, 2);
        builder.add_edge(1, 3);
        let hierarchy = builder.finish().unwrap();

        let text = to_text(&hierarchy);
        let edges: Vec<&str> = text.split("\n\n").nth(1).unwrap().lines().collect();
        assert_eq!(edges, vec!["1 -- 2", "1 -- 3", "2 -- 4"]);
    }
}
