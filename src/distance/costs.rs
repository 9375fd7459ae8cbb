//! Label cost functions for the tree edit distance.

use crate::model::Label;

/// Cost of turning one label into another.
pub type RelabelCost = fn(&Label, &Label) -> f64;

/// Cost of deleting or inserting a node with the given label.
pub type NodeCost = fn(&Label) -> f64;

/// The three cost callbacks of an edit distance computation.
///
/// All functions must return nonnegative values. The distance is symmetric
/// when `relabel` is symmetric and `delete` equals `insert`.
///
/// # Example
/// ```
/// use ephtree::distance::CostFunctions;
/// use ephtree::model::Label;
///
/// fn unit_relabel(a: &Label, b: &Label) -> f64 {
///     if a == b { 0.0 } else { 1.0 }
/// }
/// fn unit(_: &Label) -> f64 {
///     1.0
/// }
///
/// let unit_costs = CostFunctions::new(unit_relabel, unit, unit);
/// assert_eq!((unit_costs.relabel)(&Label::new(0.0, 1.0), &Label::new(0.0, 2.0)), 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CostFunctions {
    /// Cost of mapping a node of the first tree onto a node of the second
    pub relabel: RelabelCost,
    /// Cost of removing a node of the first tree
    pub delete: NodeCost,
    /// Cost of adding a node of the second tree
    pub insert: NodeCost,
}

impl CostFunctions {
    /// Bundles the given cost functions.
    pub fn new(relabel: RelabelCost, delete: NodeCost, insert: NodeCost) -> Self {
        CostFunctions { relabel, delete, insert }
    }

    /// Canonical costs: [`canonical_relabel`] and [`persistence_cost`] for
    /// both deletion and insertion.
    pub fn canonical() -> Self {
        Self::new(canonical_relabel, persistence_cost, persistence_cost)
    }
}

impl Default for CostFunctions {
    fn default() -> Self {
        Self::canonical()
    }
}

/// `max(|Δcreator|, |Δdestroyer|)`, the L∞ distance of the two pairs.
pub fn canonical_relabel(a: &Label, b: &Label) -> f64 {
    let creator = (a.creator - b.creator).abs();
    let destroyer = (a.destroyer - b.destroyer).abs();
    creator.max(destroyer)
}

/// `|creator - destroyer|`, the persistence of the label.
pub fn persistence_cost(label: &Label) -> f64 {
    label.persistence()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_costs() {
        let a = Label::new(0.0, 10.0);
        let b = Label::new(2.0, 5.0);
        let costs = CostFunctions::canonical();
        assert_eq!((costs.relabel)(&a, &b), 5.0);
        assert_eq!((costs.relabel)(&b, &a), 5.0);
        assert_eq!((costs.delete)(&a), 10.0);
        assert_eq!((costs.insert)(&b), 3.0);
    }
}
