use serde::{Deserialize, Serialize};

/// Trigger thresholds for the smell rules.
///
/// Every value is a default rather than a canonical number; projects tune
/// them in `.smellmap.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmellThresholds {
    /// long-method fires when the statement count exceeds this.
    #[serde(default = "default_long_method_statements")]
    pub long_method_statements: usize,

    /// long-method also fires when cyclomatic complexity exceeds this.
    #[serde(default = "default_long_method_complexity")]
    pub long_method_complexity: u32,

    /// Minimum parameter count for primitive-obsession.
    #[serde(default = "default_primitive_obsession_param_count")]
    pub primitive_obsession_param_count: usize,

    /// feature-envy fires above this external access ratio (0, 1].
    #[serde(default = "default_feature_envy_ratio")]
    pub feature_envy_ratio: f64,

    /// Minimum branches of one switch or if/else-if chain.
    #[serde(default = "default_type_dispatch_branches")]
    pub type_dispatch_branches: usize,

    /// Minimum shared ordered parameter names for data-clump.
    #[serde(default = "default_data_clump_min_shared_params")]
    pub data_clump_min_shared_params: usize,

    #[serde(default = "default_long_parameter_list")]
    pub long_parameter_list: usize,

    #[serde(default = "default_deep_nesting")]
    pub deep_nesting: u32,

    #[serde(default = "default_large_class_methods")]
    pub large_class_methods: usize,
}

impl Default for SmellThresholds {
    fn default() -> Self {
        Self {
            long_method_statements: default_long_method_statements(),
            long_method_complexity: default_long_method_complexity(),
            primitive_obsession_param_count: default_primitive_obsession_param_count(),
            feature_envy_ratio: default_feature_envy_ratio(),
            type_dispatch_branches: default_type_dispatch_branches(),
            data_clump_min_shared_params: default_data_clump_min_shared_params(),
            long_parameter_list: default_long_parameter_list(),
            deep_nesting: default_deep_nesting(),
            large_class_methods: default_large_class_methods(),
        }
    }
}

fn default_long_method_statements() -> usize {
    30
}
fn default_long_method_complexity() -> u32 {
    10
}
fn default_primitive_obsession_param_count() -> usize {
    4
}
fn default_feature_envy_ratio() -> f64 {
    0.67
}
fn default_type_dispatch_branches() -> usize {
    4
}
fn default_data_clump_min_shared_params() -> usize {
    3
}
fn default_long_parameter_list() -> usize {
    5
}
fn default_deep_nesting() -> u32 {
    4
}
fn default_large_class_methods() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_take_defaults() {
        let thresholds: SmellThresholds =
            toml::from_str("long_method_statements = 50").expect("valid thresholds");

        assert_eq!(thresholds.long_method_statements, 50);
        assert_eq!(thresholds.long_method_complexity, 10);
        assert_eq!(thresholds.feature_envy_ratio, 0.67);
    }

    #[test]
    fn test_unknown_threshold_is_rejected() {
        assert!(toml::from_str::<SmellThresholds>("long_method_lines = 50").is_err());
    }
}
