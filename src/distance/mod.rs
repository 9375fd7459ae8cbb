//! Tree edit distance between hierarchies.
//!
//! The distance is the minimum total cost of deleting, inserting, and
//! relabelling nodes to turn one ordered tree into another, where deleting a
//! node promotes its children into its parent at the same place. Costs come
//! from a [CostFunctions] value; [CostFunctions::canonical] compares
//! persistence pairs by their L∞ distance and charges the persistence of a
//! pair for deletion and insertion.
//!
//! The computation is the keyroot-based dynamic program of Zhang and Shasha,
//! reusing the [PostorderIndex](crate::model::PostorderIndex) precomputed for
//! every hierarchy.

pub mod costs;
mod edit_distance;

pub use costs::{canonical_relabel, persistence_cost, CostFunctions, NodeCost, RelabelCost};
pub use edit_distance::tree_edit_distance;

use crate::model::Hierarchy;

/// Returns the edit distance between two hierarchies.
///
/// # Example
/// ```
/// use ephtree::config::HierarchyConfig;
/// use ephtree::distance::{distance, CostFunctions};
/// use ephtree::hierarchy::parse_str;
///
/// let config = HierarchyConfig::default();
/// let a = parse_str("1: 0 10\n2: 0 5\n1 -- 2", &config).unwrap();
/// let b = parse_str("1: 0 10", &config).unwrap();
///
/// let costs = CostFunctions::canonical();
/// assert_eq!(distance(&a, &b, &costs), 5.0);
/// assert_eq!(distance(&a, &a, &costs), 0.0);
/// ```
pub fn distance(first: &Hierarchy, second: &Hierarchy, costs: &CostFunctions) -> f64 {
    tree_edit_distance(first.postorder_index(), second.postorder_index(), costs)
}
