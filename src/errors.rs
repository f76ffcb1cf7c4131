//! Fault taxonomy for the analysis pipeline.
//!
//! - [`ParseFault`]: a source file could not be parsed. Reported for that
//!   file; the batch continues.
//! - [`RuleFault`]: a rule evaluator failed on one declaration. Converted to
//!   an `engine-fault` finding; the remaining rules still run.
//! - [`ConfigFault`]: invalid configuration. Fatal, raised before any
//!   analysis starts.

use crate::core::{FileId, RuleId};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}:{column}: {message}")]
pub struct ParseFault {
    pub file: FileId,
    /// 1-based; 0 when the fault has no position (e.g. unsupported language).
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseFault {
    pub fn new(file: FileId, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            file,
            line,
            column,
            message: message.into(),
        }
    }

    pub fn unpositioned(file: FileId, message: impl Into<String>) -> Self {
        Self::new(file, 0, 0, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule `{rule}` failed: {message}")]
pub struct RuleFault {
    pub rule: RuleId,
    pub message: String,
}

impl RuleFault {
    pub fn new(rule: RuleId, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigFault {
    #[error("failed to read config file {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("invalid config file {}: {message}", path.display())]
    Syntax { path: PathBuf, message: String },

    #[error("invalid value for `{field}`: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigFault {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigFault::InvalidValue { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Errors surfaced to library callers outside of per-file analysis.
#[derive(Debug, Error)]
pub enum SmellmapError {
    #[error(transparent)]
    Config(#[from] ConfigFault),

    #[error("failed to discover source files under {}: {source}", root.display())]
    Discovery {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SmellmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fault_display_includes_location() {
        let fault = ParseFault::new(FileId::new("src/a.js"), 3, 7, "unexpected `}`");
        assert_eq!(fault.to_string(), "src/a.js:3:7: unexpected `}`");
    }

    #[test]
    fn test_config_fault_names_field() {
        let fault = ConfigFault::invalid("thresholds.feature_envy_ratio", "must be in (0, 1]");
        assert_eq!(fault.field(), Some("thresholds.feature_envy_ratio"));
        assert_eq!(
            fault.to_string(),
            "invalid value for `thresholds.feature_envy_ratio`: must be in (0, 1]"
        );
    }

    #[test]
    fn test_config_fault_converts_into_crate_error() {
        let err: SmellmapError = ConfigFault::invalid("rules.enabled", "unknown rule").into();
        assert!(matches!(err, SmellmapError::Config(_)));
    }
}
