//! Validating builder for [Hierarchy].
//!
//! The builder collects node declarations and parent→child edges in any order
//! and only assembles a hierarchy in [`finish`](HierarchyBuilder::finish),
//! after checking that the declarations form a single rooted tree:
//!
//! ```text
//! declare_node / add_edge ... ──→ finish() ──→ resolve edges ──→ find root ──→ check reachability ──→ Hierarchy
//!                                                  │                 │                │
//!                                   UnknownNodeReference,   NoRoot, MultipleRoots   Cycle
//!                                      MultipleParents
//! ```
//!
//! A malformed input is never repaired; every violation is reported as a
//! [ParsingError].

use crate::config::HierarchyConfig;
use crate::model::pair::PersistencePair;
use crate::model::tree::{Hierarchy, VertexIndex};
use crate::model::vertex::{NodeId, Vertex};
use crate::parser::parsing_error::{Malformation, ParsingError};
use std::collections::BTreeMap;

/// Edge recorded before node resolution.
#[derive(Debug, Clone, Copy)]
struct PendingEdge {
    parent: NodeId,
    child: NodeId,
    line: Option<usize>,
}

// =#========================================================================#=
// HIERARCHY BUILDER
// =#========================================================================#=
/// Collects nodes and edges and turns them into a validated [Hierarchy].
///
/// # Example
/// ```
/// use ephtree::model::{HierarchyBuilder, PersistencePair};
///
/// let mut builder = HierarchyBuilder::default();
/// builder.declare_node(1, PersistencePair::essential(0.0)).unwrap();
/// builder.declare_node(2, PersistencePair::finite(1.0, 2.0)).unwrap();
/// builder.add_edge(1, 2);
///
/// let hierarchy = builder.finish().unwrap();
/// assert_eq!(hierarchy.root().id(), 1);
/// assert_eq!(hierarchy.num_vertices(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct HierarchyBuilder {
    config: HierarchyConfig,
    vertices: Vec<Vertex>,
    ids: BTreeMap<NodeId, VertexIndex>,
    edges: Vec<PendingEdge>,
    name: Option<String>,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new(HierarchyConfig::default())
    }
}

impl HierarchyBuilder {
    /// Creates an empty builder normalising labels with `config`.
    pub fn new(config: HierarchyConfig) -> Self {
        HierarchyBuilder {
            config,
            vertices: Vec::new(),
            ids: BTreeMap::new(),
            edges: Vec::new(),
            name: None,
        }
    }

    /// Attaches a name to the hierarchy under construction.
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the name of the hierarchy under construction.
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    /// Declares a node, returning its arena index.
    ///
    /// # Errors
    /// `MalformedHierarchy` if `id` was declared before.
    pub fn declare_node(&mut self, id: NodeId, pair: PersistencePair) -> Result<VertexIndex, ParsingError> {
        if self.ids.contains_key(&id) {
            return Err(ParsingError::malformed(Malformation::DuplicateNode(id)));
        }

        let index = self.vertices.len();
        let label = self.config.normalize(&pair);
        self.vertices.push(Vertex::new(index, id, pair, label));
        self.ids.insert(id, index);

        Ok(index)
    }

    /// Records that `parent` is the parent of `child`.
    ///
    /// Edges are resolved in [`finish`](Self::finish), so nodes may be declared
    /// after the edges mentioning them. Edge order determines child order.
    pub fn add_edge(&mut self, parent: NodeId, child: NodeId) {
        self.edges.push(PendingEdge {
            parent,
            child,
            line: None,
        });
    }

    /// Same as [`add_edge`](Self::add_edge), remembering the input line for error reports.
    pub fn add_edge_on_line(&mut self, parent: NodeId, child: NodeId, line: usize) {
        self.edges.push(PendingEdge {
            parent,
            child,
            line: Some(line),
        });
    }

    /// Returns the number of declared nodes.
    pub fn num_nodes(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of recorded edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Validates the collected declarations and builds the hierarchy.
    ///
    /// # Errors
    /// * `UnknownNodeReference` - an edge names an undeclared id
    /// * `MalformedHierarchy` - multiple parents, zero or several roots, or a cycle
    /// * `InvalidConfig` - the labels were normalised with an out-of-range config
    pub fn finish(self) -> Result<Hierarchy, ParsingError> {
        self.config.validate()?;
        let HierarchyBuilder {
            mut vertices,
            ids,
            edges,
            name,
            ..
        } = self;

        // Resolve edges
        for edge in &edges {
            let resolve = |id: NodeId| {
                ids.get(&id)
                    .copied()
                    .ok_or_else(|| ParsingError::unknown_node_reference(id, edge.line))
            };
            let parent = resolve(edge.parent)?;
            let child = resolve(edge.child)?;

            if let Some(existing) = vertices[child].parent_index() {
                let err = ParsingError::malformed(Malformation::MultipleParents {
                    node: edge.child,
                    first: vertices[existing].id(),
                    second: edge.parent,
                });
                return Err(match edge.line {
                    Some(line) => err.at_line(line),
                    None => err,
                });
            }

            vertices[child].set_parent(parent);
            vertices[parent].push_child(child);
        }

        // Find the root
        let mut roots: Vec<NodeId> = vertices
            .iter()
            .filter(|v| !v.has_parent())
            .map(|v| v.id())
            .collect();
        let root_index = match roots.len() {
            0 => return Err(ParsingError::malformed(Malformation::NoRoot)),
            1 => ids[&roots[0]],
            _ => {
                roots.sort_unstable();
                return Err(ParsingError::malformed(Malformation::MultipleRoots(roots)));
            }
        };

        // Everything must hang below the root
        let reached = mark_reachable(&vertices, root_index);
        if let Some(unreached) = reached.iter().position(|&r| !r) {
            let on_cycle = find_cycle_vertex(&vertices, unreached);
            return Err(ParsingError::malformed(Malformation::Cycle(vertices[on_cycle].id())));
        }

        Ok(Hierarchy::from_validated(vertices, root_index, ids, name))
    }
}

/// Marks all vertices reachable from `root` via child links.
fn mark_reachable(vertices: &[Vertex], root: VertexIndex) -> Vec<bool> {
    let mut reached = vec![false; vertices.len()];
    let mut stack = vec![root];
    while let Some(index) = stack.pop() {
        if reached[index] {
            continue;
        }
        reached[index] = true;
        stack.extend_from_slice(vertices[index].children());
    }
    reached
}

/// Follows parent links from a vertex that is not reachable from the root.
///
/// With one parent per vertex and a single root, such a walk never ends at the
/// root and must revisit a vertex; that vertex lies on a cycle.
fn find_cycle_vertex(vertices: &[Vertex], start: VertexIndex) -> VertexIndex {
    let mut visited = vec![false; vertices.len()];
    let mut current = start;
    while !visited[current] {
        visited[current] = true;
        match vertices[current].parent_index() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parsing_error::ParsingErrorType;

    fn builder_with_nodes(ids: &[NodeId]) -> HierarchyBuilder {
        let mut builder = HierarchyBuilder::default();
        for &id in ids {
            builder.declare_node(id, PersistencePair::finite(0.0, id as f64)).unwrap();
        }
        builder
    }

    #[test]
    fn test_duplicate_node() {
        let mut builder = builder_with_nodes(&[1]);
        let err = builder.declare_node(1, PersistencePair::finite(0.0, 1.0)).unwrap_err();
        assert_eq!(
            err.kind(),
            &ParsingErrorType::MalformedHierarchy(Malformation::DuplicateNode(1))
        );
    }

    #[test]
    fn test_out_of_range_config_is_rejected() {
        let config = HierarchyConfig::default().with_infinite_destroyer_sentinel(f64::NAN);
        let mut builder = HierarchyBuilder::new(config);
        builder.declare_node(1, PersistencePair::essential(0.0)).unwrap();
        assert!(builder.finish().unwrap_err().is_invalid_config());
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let mut builder = builder_with_nodes(&[1, 2]);
        builder.add_edge(1, 2);
        builder.add_edge(2, 2);
        let err = builder.finish().unwrap_err();
        // 2 gets parent 1 first, so the self loop is a second parent
        assert!(matches!(
            err.kind(),
            ParsingErrorType::MalformedHierarchy(Malformation::MultipleParents { node: 2, first: 1, second: 2 })
        ));
    }

    #[test]
    fn test_detached_cycle() {
        let mut builder = builder_with_nodes(&[1, 2, 3, 4]);
        builder.add_edge(1, 2);
        builder.add_edge(3, 4);
        builder.add_edge(4, 3);
        let err = builder.finish().unwrap_err();
        assert!(matches!(
            err.kind(),
            ParsingErrorType::MalformedHierarchy(Malformation::Cycle(_))
        ));
    }

    #[test]
    fn test_all_in_cycle_has_no_root() {
        let mut builder = builder_with_nodes(&[1, 2]);
        builder.add_edge(1, 2);
        builder.add_edge(2, 1);
        let err = builder.finish().unwrap_err();
        assert_eq!(
            err.kind(),
            &ParsingErrorType::MalformedHierarchy(Malformation::NoRoot)
        );
    }

    #[test]
    fn test_edge_line_is_reported() {
        let mut builder = builder_with_nodes(&[1]);
        builder.add_edge_on_line(1, 9, 4);
        let err = builder.finish().unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnknownNodeReference(9));
        assert_eq!(err.line(), Some(4));
    }
}
