//! Data model for extended persistence hierarchies.
//!
//! # Hierarchy representation
//! Hierarchies are represented by [Hierarchy], which uses the arena pattern to
//! store [Vertex] nodes referenced by [VertexIndex]. Each vertex carries the
//! declared [PersistencePair] and its normalised finite [Label]. Children are
//! ordered; the order is part of the hierarchy's identity.
//!
//! # Building hierarchies
//! Hierarchies are constructed through [HierarchyBuilder], which checks that
//! the declared nodes and edges form a single rooted tree before anything is
//! assembled. The [parser](crate::hierarchy::HierarchyParser) drives a builder
//! line by line; tests and other producers may drive it directly.
//!
//! # Traversal
//! [PostorderIndex] holds the postorder numbering, leftmost leaves, and
//! keyroots of a hierarchy. It is computed once per hierarchy and reused by
//! every distance computation involving it.

pub mod hierarchy_builder;
pub mod pair;
pub mod postorder;
pub mod tree;
pub mod vertex;

pub use hierarchy_builder::HierarchyBuilder;
pub use pair::{Destroyer, Label, PersistencePair};
pub use postorder::{Position, PostorderIndex};
pub use tree::{Hierarchy, PostOrderIter, PreOrderIter, VertexIndex};
pub use vertex::{NodeId, Vertex};
