//! Provides the hierarchy (rooted ordered tree) representation.
//!
//! * [Hierarchy] - Main tree structure using the arena pattern
//! * [VertexIndex] as type used to index vertices in a hierarchy
//! * [PreOrderIter] and [PostOrderIter] for stack-based traversal

use crate::model::pair::{Label, PersistencePair};
use crate::model::postorder::PostorderIndex;
use crate::model::vertex::{NodeId, Vertex};
use std::collections::BTreeMap;

/// Index of a vertex in a hierarchy (arena).
pub type VertexIndex = usize;

// =$========================================================================$=
// HIERARCHY
// =$========================================================================$=
/// An extended persistence hierarchy represented using the arena pattern
/// on [Vertex].
///
/// Vertices are stored in a contiguous vector, in the order they were
/// declared, and referenced by [VertexIndex]. Children are index lists, so no
/// vertex holds a reference to another.
///
/// # Structure
/// - Exactly one vertex (the root) has no parent.
/// - Every vertex is reachable from the root; the parent relation is acyclic.
/// - Children keep their declaration order, which is significant for
///   comparisons.
/// - Postorder numbering, leftmost leaves, and keyroots are computed once on
///   construction (see [PostorderIndex]).
///
/// # Construction
/// A hierarchy can only be obtained from a validating
/// [HierarchyBuilder](crate::model::HierarchyBuilder), typically driven by the
/// [parser](crate::hierarchy::HierarchyParser). It is immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    /// Vertices of this hierarchy (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this hierarchy
    root_index: VertexIndex,

    /// Lookup from input identifiers to arena indices
    ids: BTreeMap<NodeId, VertexIndex>,

    /// Postorder numbering, leftmost leaves, keyroots
    postorder: PostorderIndex,

    /// Name of hierarchy; optional, e.g. file it was read from
    name: Option<String>,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl Hierarchy {
    /// Assembles a hierarchy from validated parts.
    pub(crate) fn from_validated(
        vertices: Vec<Vertex>,
        root_index: VertexIndex,
        ids: BTreeMap<NodeId, VertexIndex>,
        name: Option<String>,
    ) -> Self {
        let postorder = PostorderIndex::build(&vertices, root_index);
        Hierarchy {
            vertices,
            root_index,
            ids,
            postorder,
            name,
        }
    }

    /// Attaches a name to this hierarchy.
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Returns reference to name of this hierarchy, or `None` if not set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns a reference to the root vertex.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns all vertices in arena (declaration) order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the arena index of the vertex declared with `id`.
    pub fn index_of(&self, id: NodeId) -> Option<VertexIndex> {
        self.ids.get(&id).copied()
    }

    /// Returns the children of the given vertex in declaration order.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn children(&self, index: VertexIndex) -> &[VertexIndex] {
        self[index].children()
    }

    /// Returns the normalised label of the given vertex.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn label(&self, index: VertexIndex) -> &Label {
        self[index].label()
    }

    /// Returns the declared persistence pair of the given vertex.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn pair(&self, index: VertexIndex) -> &PersistencePair {
        self[index].pair()
    }

    /// Returns the number of vertices in this hierarchy.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of leaves in this hierarchy.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of non-leaf vertices (root included unless it is a leaf).
    pub fn num_internal(&self) -> usize {
        self.num_vertices() - self.num_leaves()
    }

    /// Returns the number of edges on a longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0; self.num_vertices()];
        let mut max_depth = 0;
        for vertex in self.pre_order_iter() {
            let depth = vertex.parent_index().map_or(0, |p| depths[p] + 1);
            depths[vertex.index()] = depth;
            max_depth = max_depth.max(depth);
        }
        max_depth
    }

    /// Returns the leaf reached from `index` by always following the first child.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn leftmost_leaf(&self, index: VertexIndex) -> VertexIndex {
        let mut current = index;
        while let Some(first) = self[current].first_child() {
            current = first;
        }
        current
    }

    /// Returns the vertices in postorder (each subtree before its root).
    ///
    /// The position of a vertex in this slice plus one is its dense
    /// postorder index `1..=n`.
    pub fn postorder(&self) -> &[VertexIndex] {
        self.postorder.order()
    }

    /// Returns the keyroots in ascending postorder.
    ///
    /// A keyroot is, among all vertices sharing the same leftmost leaf, the
    /// ancestor-most one. Equivalently, the root and every vertex with a left
    /// sibling.
    pub fn keyroots(&self) -> Vec<VertexIndex> {
        self.postorder
            .keyroots()
            .iter()
            .map(|&position| self.postorder.vertex_at(position))
            .collect()
    }

    /// Returns the precomputed postorder data used by the distance computation.
    pub fn postorder_index(&self) -> &PostorderIndex {
        &self.postorder
    }

    /// Returns an iterator over the hierarchy in post-order (children before parents).
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the hierarchy in pre-order (parents before children,
    /// children from left to right).
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }
}

impl std::ops::Index<VertexIndex> for Hierarchy {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

// =#========================================================================#=
// ITERATORS
// =#========================================================================#=
/// Iterator for post-order traversal (children before parents).
///
/// Backed by the precomputed postorder numbering of the hierarchy.
pub struct PostOrderIter<'a> {
    tree: &'a Hierarchy,
    next: usize,
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Hierarchy) -> Self {
        PostOrderIter { tree, next: 0 }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = *self.tree.postorder().get(self.next)?;
        self.next += 1;
        Some(&self.tree[index])
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    tree: &'a Hierarchy,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Hierarchy) -> Self {
        PreOrderIter {
            tree,
            stack: vec![tree.root_index],
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        // Push children in reverse, so the leftmost is processed first
        self.stack.extend(vertex.children().iter().rev());

        Some(vertex)
    }
}
