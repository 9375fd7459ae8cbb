//! Vertex module for persistence hierarchy representation.

use crate::model::pair::{Label, PersistencePair};
use crate::model::tree::VertexIndex;

/// Identifier of a node as written in the hierarchy input.
pub type NodeId = u64;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a persistence hierarchy.
///
/// Each vertex corresponds to one critical point pair. Besides the raw
/// [PersistencePair] it carries the normalised [Label] used by cost functions.
///
/// # Invariants
/// - `index` is index in arena
/// - `id` is unique within its hierarchy
/// - `parent` is `None` exactly for the root (once the hierarchy is built)
/// - `children` are ordered as their edges were declared
#[derive(PartialEq, Debug, Clone)]
pub struct Vertex {
    /// Index of this vertex in the hierarchy arena
    index: VertexIndex,
    /// Identifier from the input
    id: NodeId,
    /// Critical point pair as declared
    pair: PersistencePair,
    /// Normalised finite label
    label: Label,
    /// Index of the parent vertex
    parent: Option<VertexIndex>,
    /// Indices of the children, in declaration order
    children: Vec<VertexIndex>,
}

impl Vertex {
    /// Creates a new vertex without parent and children.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the arena
    /// * `id` - Identifier from the input
    /// * `pair` - Declared persistence pair
    /// * `label` - Normalised label of `pair`
    pub(crate) fn new(index: VertexIndex, id: NodeId, pair: PersistencePair, label: Label) -> Self {
        Vertex {
            index,
            id,
            pair,
            label,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        self.index
    }

    /// Returns the identifier from the input.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the declared persistence pair.
    pub fn pair(&self) -> &PersistencePair {
        &self.pair
    }

    /// Returns the normalised label.
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Returns the children in declaration order.
    pub fn children(&self) -> &[VertexIndex] {
        &self.children
    }

    /// Returns the first child, if any.
    pub fn first_child(&self) -> Option<VertexIndex> {
        self.children.first().copied()
    }

    /// Returns the number of children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if this vertex has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this vertex has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the index of the parent, or `None` for the root.
    pub fn parent_index(&self) -> Option<VertexIndex> {
        self.parent
    }

    /// Returns `true` if this vertex has a parent set.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub(crate) fn set_parent(&mut self, parent: VertexIndex) {
        self.parent = Some(parent);
    }

    pub(crate) fn push_child(&mut self, child: VertexIndex) {
        self.children.push(child);
    }
}
