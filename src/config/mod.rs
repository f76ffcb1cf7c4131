//! Configuration for smellmap.
//!
//! The raw [`SmellmapConfig`] mirrors `.smellmap.toml`. It is turned into a
//! [`ValidatedConfig`] exactly once, before any file is analyzed; an invalid
//! value is a fatal [`ConfigFault`](crate::errors::ConfigFault).

mod grouping;
mod loader;
mod thresholds;
mod validation;

pub use grouping::{default_group_patterns, GroupingDictionary, DEFAULT_GROUPS};
pub use loader::{directory_ancestors, find_config_file, load_config, load_config_from, CONFIG_FILE_NAME};
pub use thresholds::SmellThresholds;

use crate::core::RuleId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Root of `.smellmap.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmellmapConfig {
    #[serde(default)]
    pub thresholds: SmellThresholds,

    #[serde(default)]
    pub rules: RulesConfig,

    /// Replaces the built-in groups when present.
    #[serde(default)]
    pub grouping: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub ignore: IgnoreConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Rule ids to run; every smell rule when absent.
    #[serde(default)]
    pub enabled: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Per-file analysis budget in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Worker threads; rayon's default pool when absent.
    #[serde(default)]
    pub jobs: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            jobs: None,
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IgnoreConfig {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Configuration that passed validation. Shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub thresholds: SmellThresholds,
    pub enabled_rules: BTreeSet<RuleId>,
    pub grouping: GroupingDictionary,
    pub timeout: Duration,
    pub jobs: Option<usize>,
    pub ignore_patterns: Vec<glob::Pattern>,
}

impl ValidatedConfig {
    pub fn is_enabled(&self, rule: RuleId) -> bool {
        self.enabled_rules.contains(&rule)
    }
}

impl Default for ValidatedConfig {
    fn default() -> Self {
        Self {
            thresholds: SmellThresholds::default(),
            enabled_rules: RuleId::SMELLS.into_iter().collect(),
            grouping: GroupingDictionary::default(),
            timeout: Duration::from_millis(default_timeout_ms()),
            jobs: None,
            ignore_patterns: Vec::new(),
        }
    }
}

impl SmellmapConfig {
    pub fn validate(&self) -> Result<ValidatedConfig, crate::errors::ConfigFault> {
        validation::validate_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_empty_file_is_default_config() {
        let config: SmellmapConfig = toml::from_str("").expect("empty config parses");
        assert_eq!(config, SmellmapConfig::default());
        assert_eq!(config.analysis.timeout_ms, 10_000);
    }

    #[test]
    fn test_full_config_parses() {
        let config: SmellmapConfig = toml::from_str(indoc! {r#"
            [thresholds]
            long_method_statements = 40
            feature_envy_ratio = 0.8

            [rules]
            enabled = ["long-method", "data-clump"]

            [grouping]
            address = ["street*", "city"]

            [analysis]
            timeout_ms = 500
            jobs = 2

            [ignore]
            patterns = ["node_modules/**"]
        "#})
        .expect("config parses");

        assert_eq!(config.thresholds.long_method_statements, 40);
        assert_eq!(config.thresholds.type_dispatch_branches, 4);
        assert_eq!(
            config.rules.enabled.as_deref(),
            Some(&["long-method".to_string(), "data-clump".to_string()][..])
        );
        assert_eq!(config.analysis.jobs, Some(2));
        assert_eq!(config.ignore.patterns, vec!["node_modules/**"]);
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        assert!(toml::from_str::<SmellmapConfig>("[output]\nformat = \"json\"").is_err());
    }

    #[test]
    fn test_default_validated_config_enables_every_smell() {
        let config = ValidatedConfig::default();
        for rule in RuleId::SMELLS {
            assert!(config.is_enabled(rule));
        }
        assert!(!config.is_enabled(RuleId::EngineFault));
        assert_eq!(config.grouping.len(), DEFAULT_GROUPS.len());
    }
}
