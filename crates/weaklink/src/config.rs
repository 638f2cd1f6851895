//! Engine configuration.
//!
//! Loaded from a YAML file such as:
//!
//! ```yaml
//! impact:
//!   mode: undirected
//!   weak-link-threshold: 2
//! traversal:
//!   workers: 2
//!   max-depth: 12
//!   deadline-ms: 5000
//!   direction: OUTBOUND
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use crate::domain::Direction;
use crate::error::{Error, Result};
use crate::impact::{ImpactAnalyzer, ReachabilityMode};
use crate::traversal::{CancellationToken, DEFAULT_WORKERS, TraversalOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default minimum number of independent endpoint links before a node is
/// no longer considered weak.
pub const DEFAULT_WEAK_LINK_THRESHOLD: usize = 2;

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Impact analysis settings
    pub impact: ImpactConfig,

    /// Path enumeration settings
    pub traversal: TraversalConfig,
}

/// `impact` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ImpactConfig {
    /// How reachability treats connection orientation
    pub mode: ReachabilityMode,

    /// Nodes with fewer independent endpoint links than this are weak
    pub weak_link_threshold: usize,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            mode: ReachabilityMode::default(),
            weak_link_threshold: DEFAULT_WEAK_LINK_THRESHOLD,
        }
    }
}

/// `traversal` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TraversalConfig {
    /// Worker threads per enumeration
    pub workers: usize,

    /// Maximum connections per path; absent or 0 is unbounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Wall-time budget per enumeration in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,

    /// Default traversal direction
    pub direction: Direction,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            max_depth: None,
            deadline_ms: None,
            direction: Direction::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it is not valid YAML or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Save configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails and [`Error::Io`] if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `traversal.workers` or
    /// `impact.weak-link-threshold` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.traversal.workers == 0 {
            return Err(Error::Config(
                "traversal.workers must be at least 1".to_string(),
            ));
        }
        if self.impact.weak_link_threshold == 0 {
            return Err(Error::Config(
                "impact.weak-link-threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Analyzer configured with `impact.mode`.
    #[must_use]
    pub fn analyzer(&self) -> ImpactAnalyzer {
        ImpactAnalyzer::new(self.impact.mode)
    }

    /// Enumerator options from the `traversal` section.
    #[must_use]
    pub fn traversal_options(&self, cancel: Option<CancellationToken>) -> TraversalOptions {
        TraversalOptions {
            workers: self.traversal.workers,
            deadline: self.traversal.deadline_ms.map(Duration::from_millis),
            cancel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn empty_document_uses_defaults() {
        let config: EngineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.traversal.workers, DEFAULT_WORKERS);
        assert_eq!(config.impact.weak_link_threshold, DEFAULT_WEAK_LINK_THRESHOLD);
    }

    #[test]
    fn parses_kebab_case_keys() {
        let yaml = "\
impact:
  mode: directed
  weak-link-threshold: 3
traversal:
  workers: 4
  max-depth: 8
  deadline-ms: 250
  direction: INBOUND
";
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.impact.mode, ReachabilityMode::Directed);
        assert_eq!(config.impact.weak_link_threshold, 3);
        assert_eq!(config.traversal.workers, 4);
        assert_eq!(config.traversal.max_depth, Some(8));
        assert_eq!(config.traversal.direction, Direction::Inbound);

        let options = config.traversal_options(None);
        assert_eq!(options.workers, 4);
        assert_eq!(options.deadline, Some(Duration::from_millis(250)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: std::result::Result<EngineConfig, _> =
            serde_yaml::from_str("traversal:\n  threads: 3\n");
        assert!(result.is_err());
    }

    #[rstest]
    #[case::zero_workers("traversal:\n  workers: 0\n", "workers")]
    #[case::zero_threshold("impact:\n  weak-link-threshold: 0\n", "weak-link-threshold")]
    fn validate_rejects_zero(#[case] yaml: &str, #[case] field: &str) {
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains(field)));
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("weaklink.yaml");

        let mut config = EngineConfig::default();
        config.traversal.max_depth = Some(6);
        config.impact.mode = ReachabilityMode::Directed;
        config.save(&path).unwrap();

        assert_eq!(EngineConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn load_reports_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.yaml");
        fs::write(&path, "impact: [unclosed").unwrap();

        assert!(matches!(EngineConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let result = EngineConfig::load(&temp.path().join("absent.yaml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
