//! Turns a raw [`SmellmapConfig`] into a [`ValidatedConfig`].
//!
//! Every check runs before analysis starts; the first invalid value is
//! reported with its field path.

use super::{GroupingDictionary, SmellThresholds, SmellmapConfig, ValidatedConfig};
use crate::core::RuleId;
use crate::errors::ConfigFault;
use std::collections::BTreeSet;
use std::time::Duration;

pub(super) fn validate_config(config: &SmellmapConfig) -> Result<ValidatedConfig, ConfigFault> {
    validate_thresholds(&config.thresholds)?;

    let enabled_rules = validate_rules(config.rules.enabled.as_deref())?;

    let grouping = match &config.grouping {
        Some(groups) => GroupingDictionary::from_patterns(groups)?,
        None => GroupingDictionary::default(),
    };

    if config.analysis.timeout_ms == 0 {
        return Err(ConfigFault::invalid(
            "analysis.timeout_ms",
            "must be greater than 0",
        ));
    }
    if config.analysis.jobs == Some(0) {
        return Err(ConfigFault::invalid("analysis.jobs", "must be greater than 0"));
    }

    let ignore_patterns = config
        .ignore
        .patterns
        .iter()
        .map(|raw| {
            glob::Pattern::new(raw).map_err(|e| {
                ConfigFault::invalid("ignore.patterns", format!("invalid pattern '{raw}': {e}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedConfig {
        thresholds: config.thresholds.clone(),
        enabled_rules,
        grouping,
        timeout: Duration::from_millis(config.analysis.timeout_ms),
        jobs: config.analysis.jobs,
        ignore_patterns,
    })
}

fn validate_thresholds(thresholds: &SmellThresholds) -> Result<(), ConfigFault> {
    let counts: [(&str, u64); 8] = [
        (
            "long_method_statements",
            thresholds.long_method_statements as u64,
        ),
        (
            "long_method_complexity",
            thresholds.long_method_complexity as u64,
        ),
        (
            "primitive_obsession_param_count",
            thresholds.primitive_obsession_param_count as u64,
        ),
        (
            "type_dispatch_branches",
            thresholds.type_dispatch_branches as u64,
        ),
        (
            "data_clump_min_shared_params",
            thresholds.data_clump_min_shared_params as u64,
        ),
        ("long_parameter_list", thresholds.long_parameter_list as u64),
        ("deep_nesting", thresholds.deep_nesting as u64),
        ("large_class_methods", thresholds.large_class_methods as u64),
    ];

    if let Some((name, _)) = counts.iter().find(|(_, value)| *value == 0) {
        return Err(ConfigFault::invalid(
            format!("thresholds.{name}"),
            "must be greater than 0",
        ));
    }

    let ratio = thresholds.feature_envy_ratio;
    if !(ratio > 0.0 && ratio <= 1.0) {
        return Err(ConfigFault::invalid(
            "thresholds.feature_envy_ratio",
            format!("must be in (0, 1], got {ratio}"),
        ));
    }

    Ok(())
}

fn validate_rules(enabled: Option<&[String]>) -> Result<BTreeSet<RuleId>, ConfigFault> {
    match enabled {
        None => Ok(RuleId::SMELLS.into_iter().collect()),
        Some(names) => names
            .iter()
            .map(|name| {
                name.parse::<RuleId>()
                    .map_err(|message| ConfigFault::invalid("rules.enabled", message))
            })
            .collect(),
    }
}
