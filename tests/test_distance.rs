use ephtree::config::HierarchyConfig;
use ephtree::distance::{distance, CostFunctions};
use ephtree::hierarchy::{parse_file, parse_str};
use ephtree::model::{Hierarchy, HierarchyBuilder, Label, PersistencePair, PostorderIndex};
use proptest::prelude::*;
use std::collections::HashMap;
use std::path::Path;

fn parse(text: &str) -> Hierarchy {
    parse_str(text, &HierarchyConfig::default()).unwrap()
}

fn canonical(a: &Hierarchy, b: &Hierarchy) -> f64 {
    distance(a, b, &CostFunctions::canonical())
}

// --- TESTS KNOWN DISTANCES ---
#[test]
fn test_single_nodes() {
    let a = parse("1: 0 10");
    let b = parse("1: 0 0");
    assert_eq!(canonical(&a, &b), 10.0);
}

#[test]
fn test_parent_with_child_vs_singleton() {
    let a = parse("1: 0 10\n2: 0 5\n1 -- 2");
    let b = parse("1: 0 10");
    assert_eq!(canonical(&a, &b), 5.0);
    assert_eq!(canonical(&b, &a), 5.0);
}

#[test]
fn test_identity_on_fixtures() {
    let config = HierarchyConfig::default();
    for name in ["simple.txt", "essential.txt"] {
        let path = Path::new("tests").join("fixtures").join(name);
        let hierarchy = parse_file(path, &config).unwrap();
        assert_eq!(canonical(&hierarchy, &hierarchy), 0.0, "{name}");
    }
}

#[test]
fn test_ids_do_not_matter() {
    let a = parse("1:5 5\n2:4 3\n3:5 2\n1--2\n1--3\n");
    let b = parse("10 -- 20\n10 -- 30\n10: 5 5\n20: 4 3\n30: 5 2\n");
    assert_eq!(canonical(&a, &b), 0.0);
}

#[test]
fn test_essential_pairs_use_sentinel() {
    let config = HierarchyConfig::default().with_infinite_destroyer_sentinel(1000.0);
    let a = parse_str("1: 0 inf", &config).unwrap();
    let b = parse_str("1: 0 10", &config).unwrap();
    assert_eq!(distance(&a, &b, &CostFunctions::canonical()), 990.0);
}

/// Unit costs, labels compared by creator only.
fn unit_costs() -> CostFunctions {
    fn relabel(a: &Label, b: &Label) -> f64 {
        if a.creator == b.creator { 0.0 } else { 1.0 }
    }
    fn unit(_: &Label) -> f64 {
        1.0
    }
    CostFunctions::new(relabel, unit, unit)
}

#[test]
fn test_classic_unit_cost_example() {
    // f(d(a, c(b)), e) vs f(c(d(a, b)), e); letters a..f are creators 1..6
    let first = parse(
        "6: 6 0\n4: 4 0\n1: 1 0\n3: 3 0\n2: 2 0\n5: 5 0\n\
         6 -- 4\n6 -- 5\n4 -- 1\n4 -- 3\n3 -- 2\n",
    );
    let second = parse(
        "6: 6 0\n3: 3 0\n4: 4 0\n1: 1 0\n2: 2 0\n5: 5 0\n\
         6 -- 3\n6 -- 5\n3 -- 4\n4 -- 1\n4 -- 2\n",
    );
    assert_eq!(distance(&first, &second, &unit_costs()), 2.0);
    assert_eq!(distance(&second, &first, &unit_costs()), 2.0);
}

// --- RANDOMIZED PROPERTIES ---
/// Node `k > 0` hangs below `parents[k - 1]` (an earlier node); labels are integral.
fn build(root: (i32, i32), nodes: &[(prop::sample::Index, i32, i32)]) -> Hierarchy {
    let mut builder = HierarchyBuilder::default();
    builder
        .declare_node(0, PersistencePair::finite(root.0.into(), root.1.into()))
        .unwrap();
    for (k, (parent, creator, destroyer)) in nodes.iter().enumerate() {
        let id = k as u64 + 1;
        builder
            .declare_node(id, PersistencePair::finite((*creator).into(), (*destroyer).into()))
            .unwrap();
        builder.add_edge(parent.index(k + 1) as u64, id);
    }
    builder.finish().unwrap()
}

fn hierarchy_strategy(max_nodes: usize) -> impl Strategy<Value = Hierarchy> {
    (
        (0..20i32, 0..20i32),
        prop::collection::vec((any::<prop::sample::Index>(), 0..20i32, 0..20i32), 0..max_nodes),
    )
        .prop_map(|(root, nodes)| build(root, &nodes))
}

/// Exhaustive forest recursion over postorder ranges, memoised.
struct ForestRecursion<'a> {
    first: &'a PostorderIndex,
    second: &'a PostorderIndex,
    costs: CostFunctions,
    memo: HashMap<(usize, usize, usize, usize), f64>,
}

impl ForestRecursion<'_> {
    /// Distance between forests `first[i1..=j1]` and `second[i2..=j2]` (empty if `j < i`).
    fn forest(&mut self, i1: usize, j1: usize, i2: usize, j2: usize) -> f64 {
        if let Some(&d) = self.memo.get(&(i1, j1, i2, j2)) {
            return d;
        }

        let d = match (j1 >= i1, j2 >= i2) {
            (false, false) => 0.0,
            (true, false) => (i1..=j1).map(|p| (self.costs.delete)(self.first.label_at(p))).sum(),
            (false, true) => (i2..=j2).map(|p| (self.costs.insert)(self.second.label_at(p))).sum(),
            (true, true) => {
                let (l1, l2) = (self.first.leftmost_leaf(j1), self.second.leftmost_leaf(j2));
                let delete = self.forest(i1, j1 - 1, i2, j2) + (self.costs.delete)(self.first.label_at(j1));
                let insert = self.forest(i1, j1, i2, j2 - 1) + (self.costs.insert)(self.second.label_at(j2));
                let relabel = self.forest(i1, l1 - 1, i2, l2 - 1)
                    + self.forest(l1, j1 - 1, l2, j2 - 1)
                    + (self.costs.relabel)(self.first.label_at(j1), self.second.label_at(j2));
                delete.min(insert).min(relabel)
            }
        };

        self.memo.insert((i1, j1, i2, j2), d);
        d
    }
}

fn reference_distance(a: &Hierarchy, b: &Hierarchy, costs: CostFunctions) -> f64 {
    let mut recursion = ForestRecursion {
        first: a.postorder_index(),
        second: b.postorder_index(),
        costs,
        memo: HashMap::new(),
    };
    recursion.forest(1, a.num_vertices(), 1, b.num_vertices())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: every hierarchy is at distance zero from itself
    #[test]
    fn prop_identity(a in hierarchy_strategy(12)) {
        prop_assert_eq!(canonical(&a, &a), 0.0);
    }

    /// Property: distance(A, B) == distance(B, A)
    #[test]
    fn prop_symmetry(a in hierarchy_strategy(12), b in hierarchy_strategy(12)) {
        prop_assert_eq!(canonical(&a, &b), canonical(&b, &a));
    }

    /// Property: the keyroot program agrees with the exhaustive recursion
    #[test]
    fn prop_matches_forest_recursion(a in hierarchy_strategy(7), b in hierarchy_strategy(7)) {
        let costs = CostFunctions::canonical();
        prop_assert_eq!(distance(&a, &b, &costs), reference_distance(&a, &b, costs));
        prop_assert_eq!(distance(&a, &b, &unit_costs()), reference_distance(&a, &b, unit_costs()));
    }

    /// Property: never more than deleting everything and inserting everything
    #[test]
    fn prop_bounded_by_rebuild(a in hierarchy_strategy(10), b in hierarchy_strategy(10)) {
        let rebuild: f64 = a.vertices().iter().chain(b.vertices()).map(|v| v.label().persistence()).sum();
        let d = canonical(&a, &b);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= rebuild);
    }
}
