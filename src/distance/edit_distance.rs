//! Keyroot-based dynamic program for the ordered tree edit distance.
//!
//! Both trees are addressed by 1-based postorder positions. For every pair of
//! keyroots `(k1, k2)` the forest distances between all prefixes of the
//! subtrees rooted at `k1` and `k2` are computed into a scratch table. Whenever
//! both prefixes are whole subtrees, the value is a tree distance and is kept
//! in the `|T1| × |T2|` tree distance table, where later keyroot pairs look
//! it up instead of recomputing it.
//!
//! Keyroots are processed in ascending postorder, so every tree distance read
//! from the table has been stored by an earlier keyroot pair.

use crate::distance::costs::{CostFunctions, NodeCost};
use crate::model::{Position, PostorderIndex};
use std::ops::{Index, IndexMut};

/// Dense row-major table of `f64`.
struct Table {
    data: Vec<f64>,
    cols: usize,
}

impl Table {
    fn new(rows: usize, cols: usize) -> Self {
        Table {
            data: vec![0.0; rows * cols],
            cols,
        }
    }
}

impl Index<(usize, usize)> for Table {
    type Output = f64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Table {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }
}

// =#========================================================================#=
// TREE EDIT DISTANCE
// =#========================================================================#=
/// State of a single distance computation between two trees.
struct TreeEditDistance<'a> {
    first: &'a PostorderIndex,
    second: &'a PostorderIndex,
    costs: &'a CostFunctions,
    /// `delete_costs[p]` for position `p` of the first tree (`[0]` unused)
    delete_costs: Vec<f64>,
    /// `insert_costs[p]` for position `p` of the second tree (`[0]` unused)
    insert_costs: Vec<f64>,
    /// Tree distances between subtrees, indexed by positions
    tree_distances: Table,
    /// Forest distances of the current keyroot pair, indexed by prefix lengths
    forest_distances: Table,
}

impl<'a> TreeEditDistance<'a> {
    fn new(first: &'a PostorderIndex, second: &'a PostorderIndex, costs: &'a CostFunctions) -> Self {
        let (n1, n2) = (first.len(), second.len());
        TreeEditDistance {
            first,
            second,
            costs,
            delete_costs: node_costs(first, costs.delete),
            insert_costs: node_costs(second, costs.insert),
            tree_distances: Table::new(n1 + 1, n2 + 1),
            forest_distances: Table::new(n1 + 1, n2 + 1),
        }
    }

    fn compute(mut self) -> f64 {
        let (n1, n2) = (self.first.len(), self.second.len());
        for &k1 in self.first.keyroots() {
            for &k2 in self.second.keyroots() {
                self.keyroot_pair(k1, k2);
            }
        }

        self.tree_distances[(n1, n2)]
    }

    /// Fills the forest distances for the subtrees rooted at keyroots `k1` and `k2`.
    fn keyroot_pair(&mut self, k1: Position, k2: Position) {
        let l1 = self.first.leftmost_leaf(k1);
        let l2 = self.second.leftmost_leaf(k2);
        let fd = &mut self.forest_distances;
        let td = &mut self.tree_distances;

        // Empty forest against prefixes
        fd[(0, 0)] = 0.0;
        for x in l1..=k1 {
            let fx = x - l1 + 1;
            fd[(fx, 0)] = fd[(fx - 1, 0)] + self.delete_costs[x];
        }
        for y in l2..=k2 {
            let fy = y - l2 + 1;
            fd[(0, fy)] = fd[(0, fy - 1)] + self.insert_costs[y];
        }

        for x in l1..=k1 {
            let fx = x - l1 + 1;
            let lx = self.first.leftmost_leaf(x);

            for y in l2..=k2 {
                let fy = y - l2 + 1;
                let ly = self.second.leftmost_leaf(y);

                let delete = fd[(fx - 1, fy)] + self.delete_costs[x];
                let insert = fd[(fx, fy - 1)] + self.insert_costs[y];

                if lx == l1 && ly == l2 {
                    // Both prefixes are whole subtrees
                    let relabel_cost = (self.costs.relabel)(self.first.label_at(x), self.second.label_at(y));
                    let relabel = fd[(fx - 1, fy - 1)] + relabel_cost;
                    let distance = delete.min(insert).min(relabel);
                    fd[(fx, fy)] = distance;
                    td[(x, y)] = distance;
                } else {
                    let matched = fd[(lx - l1, ly - l2)] + td[(x, y)];
                    fd[(fx, fy)] = delete.min(insert).min(matched);
                }
            }
        }
    }
}

/// Evaluates `cost` for every position of `tree`, with a zero at index `0`.
fn node_costs(tree: &PostorderIndex, cost: NodeCost) -> Vec<f64> {
    std::iter::once(0.0)
        .chain(tree.labels().iter().map(cost))
        .collect()
}

/// Computes the edit distance between two trees given by their postorder data.
///
/// Runs in `O(|T1|·|T2|)` space and
/// `O(|T1|·|T2|·min(depth, leaves)(T1)·min(depth, leaves)(T2))` time.
pub fn tree_edit_distance(first: &PostorderIndex, second: &PostorderIndex, costs: &CostFunctions) -> f64 {
    TreeEditDistance::new(first, second, costs).compute()
}
