//! Scan configuration.
//!
//! Configuration is an explicit value handed to
//! [`Scanner::new`](crate::core::Scanner::new); nothing is read from global
//! state, so several differently configured scanners can coexist in one
//! process. Configuration can also be loaded from a JSON file:
//!
//! ```json
//! {
//!   "files": ["cases/login.csv"],
//!   "core_steps": {
//!     "enabled": true,
//!     "min_matches": 2,
//!     "steps_count": 8,
//!     "anchors": [
//!       { "position": 3, "action": "Enter PIN and hit Enter" },
//!       { "position": 4, "action": "Click OK button" }
//!     ]
//!   }
//! }
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use crate::prelude::*;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One entry of the core-steps template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreStep {
    /// Expected `Action` text
    pub action: String,
    /// Expected `Expected Results` text
    pub expected: String,
}

impl CoreStep {
    /// Creates a template entry.
    pub fn new(action: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            expected: expected.into(),
        }
    }
}

/// The standard CAPRI login sequence that opens most test cases.
static CAPRI_CORE_STEPS: Lazy<Vec<CoreStep>> = Lazy::new(|| {
    [
        (
            "Launch CAPRI application from desktop",
            "Windows Security Certificate Selection window pop-up displays.",
        ),
        (
            "Select appropriate PIV Card Certificate and select OK button",
            "ActivClient Login pin screen displays.",
        ),
        (
            "Enter PIN and hit Enter",
            "System Use Notification window displays.",
        ),
        ("Click OK button", "CAPRI News feed displays."),
        ("Click Close button", "CAPRI GUI version pop-up displays."),
        ("Click OK button", "CAPRI alerts screen displays."),
        (
            "Click Continue button",
            "CAPRI application loads. Patient Selector screen displays.",
        ),
        (
            "Search for Patient using Name or SSN",
            "Patient record is displayed.",
        ),
    ]
    .into_iter()
    .map(|(action, expected)| CoreStep::new(action, expected))
    .collect()
});

/// Returns the built-in core-steps template.
pub fn default_core_steps() -> &'static [CoreStep] {
    &CAPRI_CORE_STEPS
}

/// An anchor: the action expected at a fixed 1-based step position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorStep {
    /// 1-based step position (row order)
    pub position: usize,
    /// Expected action text at that position
    pub action: String,
}

impl AnchorStep {
    /// Creates an anchor.
    pub fn new(position: usize, action: impl Into<String>) -> Self {
        Self {
            position,
            action: action.into(),
        }
    }
}

/// Settings for core-steps enforcement.
///
/// A table is a "standard case" when at least `min_matches` anchors match;
/// the first `steps_count` rows of a standard case must then follow
/// `template`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreStepsConfig {
    /// Whether enforcement runs at all
    pub enabled: bool,
    /// Anchor actions used to detect a standard case
    pub anchors: Vec<AnchorStep>,
    /// Minimum number of matching anchors
    pub min_matches: usize,
    /// Number of leading steps enforced once detected
    pub steps_count: usize,
    /// Expected leading steps
    pub template: Vec<CoreStep>,
}

impl Default for CoreStepsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            anchors: vec![
                AnchorStep::new(3, "Enter PIN and hit Enter"),
                AnchorStep::new(4, "Click OK button"),
                AnchorStep::new(5, "Click OK button"),
                AnchorStep::new(8, "Click Continue button"),
            ],
            min_matches: 2,
            steps_count: 8,
            template: default_core_steps().to_vec(),
        }
    }
}

impl CoreStepsConfig {
    /// Creates a configuration with enforcement turned off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Sets whether enforcement runs.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Replaces the anchors.
    pub fn with_anchors(mut self, anchors: Vec<AnchorStep>) -> Self {
        self.anchors = anchors;
        self
    }

    /// Sets the minimum number of matching anchors.
    pub fn with_min_matches(mut self, min_matches: usize) -> Self {
        self.min_matches = min_matches;
        self
    }

    /// Sets the number of enforced leading steps.
    pub fn with_steps_count(mut self, steps_count: usize) -> Self {
        self.steps_count = steps_count;
        self
    }

    /// Replaces the template.
    pub fn with_template(mut self, template: Vec<CoreStep>) -> Self {
        self.template = template;
        self
    }

    /// Highest anchor position, or 0 without anchors.
    pub fn max_anchor_position(&self) -> usize {
        self.anchors
            .iter()
            .map(|anchor| anchor.position)
            .max()
            .unwrap_or(0)
    }

    /// Checks that the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if let Some(anchor) = self.anchors.iter().find(|anchor| anchor.position == 0) {
            return Err(CaseGuardError::configuration(format!(
                "anchor '{}' has position 0; positions are 1-based",
                anchor.action
            )));
        }
        if self.enabled && self.template.is_empty() {
            return Err(CaseGuardError::configuration(
                "core steps are enabled but the template is empty",
            ));
        }
        Ok(())
    }
}

/// Configuration for a [`Scanner`](crate::core::Scanner).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Core-steps enforcement settings
    pub core_steps: CoreStepsConfig,
}

impl ScanConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the core-steps settings.
    pub fn with_core_steps(mut self, core_steps: CoreStepsConfig) -> Self {
        self.core_steps = core_steps;
        self
    }

    /// Checks that the settings are usable.
    pub fn validate(&self) -> Result<()> {
        self.core_steps.validate()
    }
}

/// The on-disk configuration file: scan settings plus default inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Test-case files or glob patterns scanned when none are given
    pub files: Vec<String>,
    /// Scan settings
    #[serde(flatten)]
    pub scan: ScanConfig,
}

impl ConfigFile {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.scan.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CaseGuardError::configuration(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&json)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoreStepsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.min_matches, 2);
        assert_eq!(config.steps_count, 8);
        assert_eq!(config.template.len(), 8);
        assert_eq!(config.max_anchor_position(), 8);
        assert_eq!(
            config.anchors.iter().map(|a| a.position).collect::<Vec<_>>(),
            vec![3, 4, 5, 8]
        );
        assert_eq!(config.template[2].action, "Enter PIN and hit Enter");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            ConfigFile::from_json_str(r#"{"core_steps": {"min_matches": 3}}"#).unwrap();
        assert!(config.files.is_empty());
        assert_eq!(config.scan.core_steps.min_matches, 3);
        assert_eq!(config.scan.core_steps.steps_count, 8);
        assert_eq!(config.scan.core_steps.template.len(), 8);
    }

    #[test]
    fn test_files_and_disabled_core_steps() {
        let config = ConfigFile::from_json_str(
            r#"{"files": ["a.csv", "cases/*.csv"], "core_steps": {"enabled": false}}"#,
        )
        .unwrap();
        assert_eq!(config.files, vec!["a.csv", "cases/*.csv"]);
        assert!(!config.scan.core_steps.enabled);
    }

    #[test]
    fn test_rejects_zero_position() {
        let err = ConfigFile::from_json_str(
            r#"{"core_steps": {"anchors": [{"position": 0, "action": "Click OK button"}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CaseGuardError::Configuration(_)));
    }

    #[test]
    fn test_rejects_empty_template_when_enabled() {
        let config = CoreStepsConfig::default().with_template(Vec::new());
        assert!(config.validate().is_err());
        assert!(config.with_enabled(false).validate().is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let err = ConfigFile::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CaseGuardError::Serialization(_)));
    }
}
