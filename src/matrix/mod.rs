//! Pairwise distance matrices over batches of hierarchies.
//!
//! * [DistanceMatrix] - dense symmetric result with zero diagonal
//! * [MatrixBuilder] - configurable, cancellable, parallel construction
//! * [build_matrix] - quick API with default settings
//! * [write_matrix] / [write_matrix_file] - whitespace-delimited output

pub mod builder;
pub mod writer;

pub use builder::{build_matrix, BatchCancelled, BatchConfig, CancelToken, MatrixBuilder};
pub use writer::{write_matrix, write_matrix_file};

use std::fmt;

// =#========================================================================#=
// DISTANCE MATRIX
// =#========================================================================#=
/// Dense `n × n` matrix of pairwise distances, stored row-major.
///
/// Row and column `i` belong to the `i`-th hierarchy of the input batch.
/// The diagonal is zero and `get(i, j) == get(j, i)` for all cells.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Creates a zero matrix of the given size.
    pub(crate) fn zeros(size: usize) -> Self {
        DistanceMatrix {
            size,
            values: vec![0.0; size * size],
        }
    }

    /// Sets both `(i, j)` and `(j, i)`.
    pub(crate) fn set_symmetric(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.size + j] = value;
        self.values[j * self.size + i] = value;
    }

    /// Returns the number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` for a matrix over no hierarchies.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the distance between hierarchies `i` and `j`.
    ///
    /// # Panics
    /// Panics if `i` or `j` is not below [size](Self::size).
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size && j < self.size, "Cell ({i}, {j}) out of bounds for size {}", self.size);
        self.values[i * self.size + j]
    }

    /// Returns row `i`.
    ///
    /// # Panics
    /// Panics if `i` is not below [size](Self::size).
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    /// Returns an iterator over all rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.size.max(1))
    }

    /// Returns all values in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Checks for zero diagonal and exact symmetry.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| {
            self.get(i, i) == 0.0 && (i + 1..self.size).all(|j| self.get(i, j) == self.get(j, i))
        })
    }

    /// Groups hierarchies that are at distance zero from each other.
    ///
    /// Zero distance is treated as an equivalence (transitively closed), so two
    /// hierarchies land in the same group if a chain of zero-distance pairs
    /// connects them. Only groups with at least two members are returned; each
    /// group is sorted and groups are ordered by their smallest member.
    ///
    /// # Example
    /// ```
    /// use ephtree::config::HierarchyConfig;
    /// use ephtree::distance::CostFunctions;
    /// use ephtree::hierarchy::parse_str;
    /// use ephtree::matrix::build_matrix;
    ///
    /// let config = HierarchyConfig::default();
    /// let texts = ["1: 0 4", "1: 0 9", "7: 0 4"];
    /// let hierarchies: Vec<_> = texts.iter().map(|t| parse_str(t, &config).unwrap()).collect();
    ///
    /// let matrix = build_matrix(&hierarchies, &CostFunctions::canonical());
    /// assert_eq!(matrix.duplicate_classes(), vec![vec![0, 2]]);
    /// ```
    pub fn duplicate_classes(&self) -> Vec<Vec<usize>> {
        let mut sets = DisjointSets::new(self.size);
        for i in 0..self.size {
            for j in i + 1..self.size {
                if self.get(i, j) == 0.0 {
                    sets.union(i, j);
                }
            }
        }

        // Representatives are visited in order of their smallest member
        let mut group_of_root: Vec<Option<usize>> = vec![None; self.size];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for i in 0..self.size {
            let root = sets.find(i);
            match group_of_root[root] {
                Some(group) => groups[group].push(i),
                None => {
                    group_of_root[root] = Some(groups.len());
                    groups.push(vec![i]);
                }
            }
        }

        groups.retain(|group| group.len() > 1);
        groups
    }
}

impl fmt::Display for DistanceMatrix {
    /// One row per line, values separated by single spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{value}")?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Union-find over `0..n` with path halving.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        DisjointSets {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Smaller index becomes the representative
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[high] = low;
        }
    }
}
