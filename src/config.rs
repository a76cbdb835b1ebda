//! Annotation manager configuration.
//!
//! Every field has a default, so a YAML file only needs the keys it changes:
//!
//! ```yaml
//! default_marker:
//!   radius: 0.35
//! callout_gap: 0.25
//! invariant_policy: report
//! ```

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::visual::Rgba;

/// Appearance of the fallback marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// Sphere radius in meters.
    pub radius: f64,

    /// Solid fill colour.
    pub color: Rgba,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 0.2,
            color: Rgba::RED,
        }
    }
}

/// What to do when a host callback references an anchor the registry never created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvariantPolicy {
    /// Abort: continuing would corrupt the node index.
    Panic,
    /// Log at error level and return the error to the caller.
    Report,
}

impl Default for InvariantPolicy {
    fn default() -> Self {
        Self::Panic
    }
}

/// Configuration for the `AnnotationManager`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Marker used when no node provider supplies a visual.
    pub default_marker: MarkerStyle,

    /// Vertical gap in meters between a visual's bounding box and its callout.
    pub callout_gap: f64,

    /// Handling of registry consistency violations.
    pub invariant_policy: InvariantPolicy,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            default_marker: MarkerStyle::default(),
            callout_gap: 0.5,
            invariant_policy: InvariantPolicy::default(),
        }
    }
}

impl ManagerConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ManagerConfig =
            serde_yaml::from_str(yaml).context("Failed to parse manager config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ManagerConfig = serde_yaml::from_reader(
            File::open(path).with_context(|| format!("Failed to open {:?}", path))?,
        )
        .with_context(|| format!("Failed to parse {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.default_marker.radius.is_finite() && self.default_marker.radius > 0.0) {
            bail!(
                "Marker radius must be positive, got {}",
                self.default_marker.radius
            );
        }
        if !self.callout_gap.is_finite() {
            bail!("Callout gap must be finite, got {}", self.callout_gap);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_config_default() {
        let config = ManagerConfig::default();
        assert_eq!(config.default_marker.radius, 0.2);
        assert_eq!(config.default_marker.color, Rgba::RED);
        assert_eq!(config.callout_gap, 0.5);
        assert_eq!(config.invariant_policy, InvariantPolicy::Panic);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ManagerConfig::from_yaml_str(
            "default_marker:\n  radius: 0.35\ninvariant_policy: report\n",
        )
        .unwrap();

        assert_eq!(config.default_marker.radius, 0.35);
        assert_eq!(config.default_marker.color, Rgba::RED);
        assert_eq!(config.callout_gap, 0.5);
        assert_eq!(config.invariant_policy, InvariantPolicy::Report);
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let err = ManagerConfig::from_yaml_str("default_marker:\n  radius: 0.0\n").unwrap_err();
        assert!(err.to_string().contains("radius"));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = ManagerConfig::from_yaml_file("/nonexistent/geoar.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
