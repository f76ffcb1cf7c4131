// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod metrics;
pub mod observability;
pub mod pipeline;
pub mod report;
pub mod smells;

// Re-export commonly used types
pub use crate::core::{
    Declaration, DeclarationKind, FileId, Finding, Language, RefactoringCategory, RuleId,
    Severity, SourceUnit, Span,
};

pub use crate::analyzers::{get_facade, parse_source, SyntaxFacade};

pub use crate::config::{SmellmapConfig, ValidatedConfig};

pub use crate::errors::{ConfigFault, ParseFault, RuleFault, SmellmapError};

pub use crate::metrics::{extract_metrics, extract_unit_metrics, MetricName, Metrics, UnitMetrics};

pub use crate::pipeline::{evaluate_rules, Deadline, Engine, SourceInput};

pub use crate::report::{Report, ReportEntry};

pub use crate::smells::{Rule, RuleContext, RuleRegistry, SmellRule};
