//! Persistence pairs and the finite labels derived from them.
//!
//! * [PersistencePair] - critical point pair as read from the input, whose
//!   destroyer may be infinite (essential feature)
//! * [Destroyer] - finite or infinite destroyer value
//! * [Label] - normalised, always finite pair used in cost computations

use std::fmt;

/// Token written for an infinite destroyer.
pub(crate) const INFINITY_TOKEN: &str = "inf";

// =#========================================================================#=
// DESTROYER
// =#========================================================================#=
/// Destroyer of a persistence pair, either a finite value or infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Destroyer {
    /// Feature is destroyed at the given (finite) function value.
    Finite(f64),
    /// Feature is never destroyed.
    Infinite,
}

impl Destroyer {
    /// Returns `true` if this destroyer is infinite.
    pub fn is_infinite(&self) -> bool {
        matches!(self, Destroyer::Infinite)
    }

    /// Returns the value if finite, else `None`.
    pub fn finite_value(&self) -> Option<f64> {
        match self {
            Destroyer::Finite(value) => Some(*value),
            Destroyer::Infinite => None,
        }
    }
}

impl fmt::Display for Destroyer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destroyer::Finite(value) => write!(f, "{value}"),
            Destroyer::Infinite => f.write_str(INFINITY_TOKEN),
        }
    }
}

// =#========================================================================#=
// PERSISTENCE PAIR
// =#========================================================================#=
/// A (creator, destroyer) pair of function values marking when a topological
/// feature appears and disappears.
///
/// # Invariants
/// - `creator` is finite
/// - `destroyer` is finite or [Destroyer::Infinite]; never NaN
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistencePair {
    creator: f64,
    destroyer: Destroyer,
}

impl PersistencePair {
    /// Creates a new persistence pair.
    ///
    /// # Panics
    /// Panics if `creator` or a finite `destroyer` is not finite.
    pub fn new(creator: f64, destroyer: Destroyer) -> Self {
        assert!(creator.is_finite(), "Creator must be finite, got {}", creator);
        if let Destroyer::Finite(value) = destroyer {
            assert!(value.is_finite(), "Finite destroyer must be finite, got {}", value);
        }
        PersistencePair { creator, destroyer }
    }

    /// Creates a pair with a finite destroyer.
    ///
    /// # Panics
    /// Panics if either value is not finite.
    pub fn finite(creator: f64, destroyer: f64) -> Self {
        Self::new(creator, Destroyer::Finite(destroyer))
    }

    /// Creates a pair with an infinite destroyer (essential feature).
    ///
    /// # Panics
    /// Panics if `creator` is not finite.
    pub fn essential(creator: f64) -> Self {
        Self::new(creator, Destroyer::Infinite)
    }

    /// Returns the creator value.
    pub fn creator(&self) -> f64 {
        self.creator
    }

    /// Returns the destroyer.
    pub fn destroyer(&self) -> Destroyer {
        self.destroyer
    }

    /// Returns `true` if the destroyer is infinite.
    pub fn is_essential(&self) -> bool {
        self.destroyer.is_infinite()
    }

    /// Returns the absolute persistence `|creator - destroyer|`,
    /// which is [f64::INFINITY] for essential pairs.
    pub fn persistence(&self) -> f64 {
        match self.destroyer {
            Destroyer::Finite(destroyer) => (self.creator - destroyer).abs(),
            Destroyer::Infinite => f64::INFINITY,
        }
    }
}

impl fmt::Display for PersistencePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.creator, self.destroyer)
    }
}

// =#========================================================================#=
// LABEL
// =#========================================================================#=
/// Finite node label as seen by cost functions.
///
/// Obtained from a [PersistencePair] by
/// [HierarchyConfig::normalize](crate::config::HierarchyConfig::normalize),
/// which applies scaling and substitutes the infinite destroyer sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label {
    pub creator: f64,
    pub destroyer: f64,
}

impl Label {
    pub fn new(creator: f64, destroyer: f64) -> Self {
        Label { creator, destroyer }
    }

    /// Returns the absolute persistence `|creator - destroyer|`.
    pub fn persistence(&self) -> f64 {
        (self.creator - self.destroyer).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence() {
        assert_eq!(PersistencePair::finite(4.0, 1.5).persistence(), 2.5);
        assert_eq!(PersistencePair::essential(0.0).persistence(), f64::INFINITY);
        assert_eq!(Label::new(-1.0, 2.0).persistence(), 3.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(PersistencePair::finite(1.0, 0.25).to_string(), "1\t0.25");
        assert_eq!(PersistencePair::essential(3.5).to_string(), "3.5\tinf");
    }

    #[test]
    #[should_panic]
    fn test_nan_creator_panics() {
        PersistencePair::finite(f64::NAN, 1.0);
    }
}
