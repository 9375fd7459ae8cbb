//! Postorder numbering of a hierarchy together with leftmost leaves and keyroots.
//!
//! Positions are 1-based: the first vertex visited in postorder has position
//! `1`, the root has position `n`. Position `0` stands for the empty forest.

use crate::model::pair::Label;
use crate::model::tree::VertexIndex;
use crate::model::vertex::Vertex;

/// Postorder position of a vertex (1-based).
pub type Position = usize;

// =#========================================================================#=
// POSTORDER INDEX
// =#========================================================================#=
/// Precomputed postorder data of a hierarchy.
///
/// Built once when a [Hierarchy](crate::model::Hierarchy) is finished and
/// shared by every comparison involving that hierarchy.
///
/// # Structure
/// - `order[p - 1]` is the vertex at position `p`
/// - `positions[v]` is the position of vertex `v`
/// - `leftmost[p]` is the position of the leftmost leaf below position `p`
///   (`leftmost[0]` is unused)
/// - `keyroots` lists, for every distinct leftmost leaf, the highest position
///   sharing it, in ascending order
/// - `labels[p - 1]` is the label of the vertex at position `p`
#[derive(Debug, Clone, PartialEq)]
pub struct PostorderIndex {
    order: Vec<VertexIndex>,
    positions: Vec<Position>,
    leftmost: Vec<Position>,
    keyroots: Vec<Position>,
    labels: Vec<Label>,
}

impl PostorderIndex {
    /// Numbers all vertices below `root` in postorder.
    ///
    /// Uses an explicit stack, so deep hierarchies do not overflow the call stack.
    pub(crate) fn build(vertices: &[Vertex], root: VertexIndex) -> Self {
        let n = vertices.len();
        let mut order = Vec::with_capacity(n);
        let mut positions = vec![0; n];
        let mut leftmost = Vec::with_capacity(n + 1);
        leftmost.push(0);

        // (vertex, index of next child to descend into)
        let mut stack: Vec<(VertexIndex, usize)> = vec![(root, 0)];
        while let Some(top) = stack.last_mut() {
            let (vertex, next) = *top;
            let children = vertices[vertex].children();

            if next < children.len() {
                top.1 += 1;
                stack.push((children[next], 0));
            } else {
                stack.pop();
                order.push(vertex);
                let position = order.len();
                positions[vertex] = position;
                let leftmost_leaf = match children.first() {
                    Some(&first) => leftmost[positions[first]],
                    None => position,
                };
                leftmost.push(leftmost_leaf);
            }
        }

        let keyroots = compute_keyroots(&leftmost);
        let labels = order.iter().map(|&v| *vertices[v].label()).collect();

        PostorderIndex {
            order,
            positions,
            leftmost,
            keyroots,
            labels,
        }
    }

    /// Returns the number of numbered vertices.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no vertex is numbered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the vertices in postorder.
    pub fn order(&self) -> &[VertexIndex] {
        &self.order
    }

    /// Returns the position of the given vertex.
    ///
    /// # Panics
    /// Panics if `vertex` is out of bounds.
    pub fn position_of(&self, vertex: VertexIndex) -> Position {
        self.positions[vertex]
    }

    /// Returns the vertex at the given position.
    ///
    /// # Panics
    /// Panics if `position` is not in `1..=len()`.
    pub fn vertex_at(&self, position: Position) -> VertexIndex {
        self.order[position - 1]
    }

    /// Returns the position of the leftmost leaf below the given position.
    ///
    /// # Panics
    /// Panics if `position` is not in `1..=len()`.
    #[inline]
    pub fn leftmost_leaf(&self, position: Position) -> Position {
        self.leftmost[position]
    }

    /// Returns the keyroot positions in ascending order.
    pub fn keyroots(&self) -> &[Position] {
        &self.keyroots
    }

    /// Returns the label of the vertex at the given position.
    ///
    /// # Panics
    /// Panics if `position` is not in `1..=len()`.
    #[inline]
    pub fn label_at(&self, position: Position) -> &Label {
        &self.labels[position - 1]
    }

    /// Returns all labels in postorder.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }
}

/// Scans positions from the root downwards and keeps the first position seen
/// for every leftmost leaf, i.e. the ancestor-most one.
fn compute_keyroots(leftmost: &[Position]) -> Vec<Position> {
    let n = leftmost.len() - 1;
    let mut seen = vec![false; n + 1];
    let mut keyroots = Vec::new();

    for position in (1..=n).rev() {
        let leaf = leftmost[position];
        if !seen[leaf] {
            seen[leaf] = true;
            keyroots.push(position);
        }
    }

    keyroots.reverse();
    keyroots
}
