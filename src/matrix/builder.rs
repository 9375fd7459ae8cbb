//! Batch construction of distance matrices.
//!
//! Every unordered pair `i < j` is one independent work item. Small batches
//! run serially; larger ones are spread over rayon's work-stealing pool, or a
//! dedicated pool when the thread count is bounded. Work items only read the
//! shared hierarchies, and results are written into the matrix after all
//! items have finished.

use crate::distance::{distance, CostFunctions};
use crate::matrix::DistanceMatrix;
use crate::model::Hierarchy;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

// =#========================================================================#=
// BATCH CONFIG
// =#========================================================================#=
/// Scheduling settings of a matrix batch.
///
/// # Examples
/// ```
/// use ephtree::matrix::BatchConfig;
///
/// let config = BatchConfig {
///     parallel_threshold: 16, // Parallelize if >= 16 pairs
///     max_threads: Some(4),   // Use at most 4 threads
/// };
/// assert_eq!(BatchConfig::default().max_threads, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Minimum number of pairs to trigger parallel processing.
    ///
    /// Smaller batches are computed serially to avoid thread pool overhead.
    /// Default: 32
    pub parallel_threshold: usize,

    /// Maximum number of threads to use for parallel processing.
    ///
    /// None means use rayon's global pool (typically one thread per core).
    /// Default: None
    pub max_threads: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 32,
            max_threads: None,
        }
    }
}

// =#========================================================================#=
// CANCELLATION
// =#========================================================================#=
/// Shareable flag to cancel a running batch.
///
/// Clones share the flag. Cancellation takes effect at cell granularity:
/// cells already being computed finish, no new cell is started.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every batch observing this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A batch stopped by its [CancelToken] before all cells were computed.
///
/// No matrix is exposed; the hierarchies remain valid and the batch can be
/// run again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Matrix batch cancelled after {} of {total} cells", .completed.len())]
pub struct BatchCancelled {
    /// Cells `(i, j)` with `i < j` that were computed, in ascending order
    pub completed: Vec<(usize, usize)>,
    /// Number of cells `(i, j)` with `i < j` in the batch
    pub total: usize,
}

// =#========================================================================#=
// MATRIX BUILDER
// =#========================================================================#=
/// Computes the pairwise distance matrix of a batch of hierarchies.
///
/// # Example
/// ```
/// use ephtree::config::HierarchyConfig;
/// use ephtree::distance::CostFunctions;
/// use ephtree::hierarchy::parse_str;
/// use ephtree::matrix::{CancelToken, MatrixBuilder};
///
/// let config = HierarchyConfig::default();
/// let hierarchies = vec![
///     parse_str("1: 0 10", &config).unwrap(),
///     parse_str("1: 0 0", &config).unwrap(),
/// ];
///
/// let token = CancelToken::new();
/// let matrix = MatrixBuilder::new(CostFunctions::canonical())
///     .with_max_threads(2)
///     .with_cancel_token(token.clone())
///     .build(&hierarchies)
///     .unwrap();
/// assert_eq!(matrix.get(0, 1), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct MatrixBuilder {
    costs: CostFunctions,
    config: BatchConfig,
    cancel: Option<CancelToken>,
}

impl Default for MatrixBuilder {
    fn default() -> Self {
        Self::new(CostFunctions::canonical())
    }
}

impl MatrixBuilder {
    /// Creates a builder using `costs` and the default [BatchConfig].
    pub fn new(costs: CostFunctions) -> Self {
        MatrixBuilder {
            costs,
            config: BatchConfig::default(),
            cancel: None,
        }
    }

    /// Replaces the scheduling settings.
    pub fn with_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the minimum number of pairs computed in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.config.parallel_threshold = threshold;
        self
    }

    /// Bounds the number of worker threads by running on a dedicated pool.
    pub fn with_max_threads(mut self, threads: usize) -> Self {
        self.config.max_threads = Some(threads);
        self
    }

    /// Makes the batch observe `token`.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the scheduling settings.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Computes the distance matrix of `hierarchies`.
    ///
    /// # Errors
    /// [BatchCancelled] if the cancel token was triggered before every cell
    /// was computed.
    pub fn build(&self, hierarchies: &[Hierarchy]) -> Result<DistanceMatrix, BatchCancelled> {
        let pairs = upper_triangle(hierarchies.len());
        let cancel = self.cancel.as_ref();
        let start_time = Instant::now();
        info!(hierarchies = hierarchies.len(), pairs = pairs.len(), "building distance matrix");

        let cells = self.dispatch(&pairs, |&(i, j)| {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                None
            } else {
                Some(distance(&hierarchies[i], &hierarchies[j], &self.costs))
            }
        });

        if cells.iter().any(Option::is_none) {
            let completed: Vec<(usize, usize)> = pairs
                .iter()
                .zip(&cells)
                .filter(|(_, cell)| cell.is_some())
                .map(|(&pair, _)| pair)
                .collect();
            warn!(completed = completed.len(), total = pairs.len(), "distance matrix batch cancelled");
            return Err(BatchCancelled {
                completed,
                total: pairs.len(),
            });
        }

        let matrix = assemble(hierarchies.len(), &pairs, cells.into_iter().flatten());
        info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "distance matrix complete");
        Ok(matrix)
    }

    /// Runs `cell` on every pair, serially or in parallel, keeping pair order.
    fn dispatch<T, F>(&self, pairs: &[(usize, usize)], cell: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&(usize, usize)) -> T + Sync + Send,
    {
        if pairs.len() < self.config.parallel_threshold {
            return pairs.iter().map(cell).collect();
        }

        let Some(max_threads) = self.config.max_threads else {
            return pairs.par_iter().map(cell).collect();
        };

        match rayon::ThreadPoolBuilder::new().num_threads(max_threads).build() {
            Ok(pool) => pool.install(|| pairs.par_iter().map(&cell).collect()),
            Err(err) => {
                warn!(max_threads, error = %err, "could not build thread pool, using global pool");
                pairs.par_iter().map(cell).collect()
            }
        }
    }
}

/// Lists all `(i, j)` with `i < j < n` in row-major order.
fn upper_triangle(n: usize) -> Vec<(usize, usize)> {
    (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect()
}

/// Fans computed cells into a symmetric matrix.
fn assemble<I: IntoIterator<Item = f64>>(size: usize, pairs: &[(usize, usize)], values: I) -> DistanceMatrix {
    let mut matrix = DistanceMatrix::zeros(size);
    for (&(i, j), value) in pairs.iter().zip(values) {
        matrix.set_symmetric(i, j, value);
    }
    matrix
}

/// Computes the distance matrix of `hierarchies` with default scheduling.
///
/// # Example
/// ```
/// use ephtree::config::HierarchyConfig;
/// use ephtree::distance::CostFunctions;
/// use ephtree::hierarchy::parse_str;
/// use ephtree::matrix::build_matrix;
///
/// let config = HierarchyConfig::default();
/// let hierarchies: Vec<_> = ["1: 0 10", "1: 0 0", "1: 0 10\n2: 0 5\n1 -- 2"]
///     .iter()
///     .map(|text| parse_str(text, &config).unwrap())
///     .collect();
///
/// let matrix = build_matrix(&hierarchies, &CostFunctions::canonical());
/// assert_eq!(matrix.size(), 3);
/// assert_eq!(matrix.get(0, 2), 5.0);
/// assert!(matrix.is_symmetric());
/// ```
pub fn build_matrix(hierarchies: &[Hierarchy], costs: &CostFunctions) -> DistanceMatrix {
    match MatrixBuilder::new(*costs).build(hierarchies) {
        Ok(matrix) => matrix,
        Err(_) => unreachable!("batch without cancel token was cancelled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_triangle() {
        assert_eq!(upper_triangle(3), vec![(0, 1), (0, 2), (1, 2)]);
        assert!(upper_triangle(1).is_empty());
        assert!(upper_triangle(0).is_empty());
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_empty_batch() {
        let matrix = MatrixBuilder::default().build(&[]).unwrap();
        assert_eq!(matrix.size(), 0);
    }
}
