//! Numeric configuration applied to persistence pairs before any cost
//! computation.
//!
//! A [HierarchyConfig] decides how a declared [PersistencePair] becomes a
//! finite [Label]:
//! 1. finite values are optionally scaled by an integer factor and rounded to
//!    the nearest integer (deterministic integer arithmetic for consumers
//!    requiring it),
//! 2. an infinite destroyer is replaced by a single finite sentinel, which is
//!    *not* scaled.
//!
//! The configuration applies uniformly to every hierarchy of a comparison run.
//! It can be built in code or read from TOML:
//!
//! ```
//! use ephtree::config::HierarchyConfig;
//!
//! let config = HierarchyConfig::from_toml_str(
//!     r#"
//!     infinite_destroyer_sentinel = 1.0e10
//!
//!     [scale]
//!     enabled = true
//!     factor = 1000
//!     "#,
//! ).unwrap();
//! assert_eq!(config.scale.factor, 1000);
//! ```

use crate::model::{Destroyer, Label, PersistencePair};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default substitute for an infinite destroyer.
pub const DEFAULT_INFINITE_DESTROYER_SENTINEL: f64 = 1.0e9;

/// Largest accepted sentinel (2^40). Sums of up to 2^13 sentinel-sized costs
/// stay below 2^53 and are thus exact for integer-valued labels.
pub const MAX_INFINITE_DESTROYER_SENTINEL: f64 = (1u64 << 40) as f64;

// =#========================================================================#=
// CONFIG ERROR
// =#========================================================================#=
/// Errors raised while loading or validating a [HierarchyConfig].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Scale factor must be at least one.
    #[error("Invalid scale factor {0}, must be at least 1")]
    InvalidScaleFactor(u32),

    /// Sentinel must be finite, positive, and bounded.
    #[error("Invalid infinite destroyer sentinel {0}, must be finite and in (0, {max}]", max = MAX_INFINITE_DESTROYER_SENTINEL)]
    InvalidSentinel(f64),

    /// TOML could not be deserialized.
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration could not be serialized.
    #[error("Could not serialize configuration: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Configuration file could not be read.
    #[error("I/O error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =#========================================================================#=
// SCALE CONFIG
// =#========================================================================#=
/// Optional scaling of finite values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaleConfig {
    /// Whether finite values get scaled and rounded.
    pub enabled: bool,
    /// Multiplier applied to finite values when enabled.
    pub factor: u32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            factor: 1,
        }
    }
}

// =#========================================================================#=
// HIERARCHY CONFIG
// =#========================================================================#=
/// Numeric normalisation settings for hierarchy labels.
///
/// # Default
/// Scaling disabled, infinite destroyers replaced by
/// [DEFAULT_INFINITE_DESTROYER_SENTINEL].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HierarchyConfig {
    /// Finite value substituted for an infinite destroyer.
    #[serde(alias = "infiniteDestroyerSentinel")]
    pub infinite_destroyer_sentinel: f64,
    /// Scaling of finite values.
    pub scale: ScaleConfig,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            scale: ScaleConfig::default(),
            infinite_destroyer_sentinel: DEFAULT_INFINITE_DESTROYER_SENTINEL,
        }
    }
}

impl HierarchyConfig {
    /// Enables scaling of finite values by `factor`.
    pub fn with_scale(mut self, factor: u32) -> Self {
        self.scale = ScaleConfig {
            enabled: true,
            factor,
        };
        self
    }

    /// Disables scaling.
    pub fn without_scale(mut self) -> Self {
        self.scale.enabled = false;
        self
    }

    /// Sets the value substituted for an infinite destroyer.
    pub fn with_infinite_destroyer_sentinel(mut self, sentinel: f64) -> Self {
        self.infinite_destroyer_sentinel = sentinel;
        self
    }

    /// Checks the scale factor and the sentinel bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scale.factor == 0 {
            return Err(ConfigError::InvalidScaleFactor(self.scale.factor));
        }

        let sentinel = self.infinite_destroyer_sentinel;
        if !sentinel.is_finite() || sentinel <= 0.0 || sentinel > MAX_INFINITE_DESTROYER_SENTINEL {
            return Err(ConfigError::InvalidSentinel(sentinel));
        }

        Ok(())
    }

    /// Parses and validates a configuration from a TOML string.
    /// Missing keys fall back to their defaults.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: HierarchyConfig = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Serializes the configuration to TOML, readable by [from_toml_str](Self::from_toml_str).
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Applies the configured scaling to a finite value.
    pub fn scale_value(&self, value: f64) -> f64 {
        if self.scale.enabled {
            (value * f64::from(self.scale.factor)).round()
        } else {
            value
        }
    }

    /// Turns a declared pair into the finite label seen by cost functions.
    pub fn normalize(&self, pair: &PersistencePair) -> Label {
        let creator = self.scale_value(pair.creator());
        let destroyer = match pair.destroyer() {
            Destroyer::Finite(value) => self.scale_value(value),
            Destroyer::Infinite => self.infinite_destroyer_sentinel,
        };
        Label::new(creator, destroyer)
    }
}
