//! Per-file analysis pipeline: source → facade → metrics → rules → findings.
//!
//! Files are independent. A batch runs them on rayon's pool and shares only
//! the validated config and the rule registry, both read-only. Faults local
//! to a file or a rule become report entries and never abort the batch.

mod deadline;

pub use deadline::{Deadline, DeadlineExceeded};

use crate::analyzers::parse_source;
use crate::config::ValidatedConfig;
use crate::core::{FileId, Finding, Language, RuleId, SourceUnit};
use crate::errors::{ParseFault, RuleFault};
use crate::metrics::{extract_unit_metrics, UnitMetrics};
use crate::report::Report;
use crate::smells::{RuleContext, RuleRegistry, SmellRule};
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, debug_span, warn};

/// One source to analyze.
#[derive(Debug, Clone)]
pub enum SourceInput {
    /// Read from disk; the language comes from the extension.
    Path(PathBuf),
    Memory {
        file: FileId,
        language: Language,
        text: String,
    },
}

impl SourceInput {
    pub fn memory(file: impl Into<String>, language: Language, text: impl Into<String>) -> Self {
        SourceInput::Memory {
            file: FileId::new(file),
            language,
            text: text.into(),
        }
    }

    pub fn file_id(&self) -> FileId {
        match self {
            SourceInput::Path(path) => FileId::from_path(path),
            SourceInput::Memory { file, .. } => file.clone(),
        }
    }
}

/// Why a file produced no regular findings.
#[derive(Debug, Clone, Error)]
pub enum FileFault {
    #[error("failed to read source: {0}")]
    Read(String),

    #[error(transparent)]
    Parse(#[from] ParseFault),

    #[error(transparent)]
    Timeout(#[from] DeadlineExceeded),
}

impl FileFault {
    /// The single file-level entry that replaces the file's findings.
    pub fn into_finding(self, file: FileId) -> Finding {
        match self {
            FileFault::Read(message) => Finding::file_level(
                file,
                RuleId::ReadFault,
                0,
                format!("failed to read source: {message}"),
            ),
            FileFault::Parse(fault) => {
                let message = if fault.line == 0 {
                    fault.message
                } else {
                    format!(
                        "syntax error at {}:{}: {}",
                        fault.line, fault.column, fault.message
                    )
                };
                Finding::file_level(file, RuleId::ParseFault, fault.line, message)
            }
            FileFault::Timeout(exceeded) => {
                Finding::file_level(file, RuleId::AnalysisTimeout, 0, exceeded.to_string())
            }
        }
    }
}

pub struct Engine {
    config: ValidatedConfig,
    registry: RuleRegistry,
    timeout: Option<Duration>,
    language: Option<Language>,
}

impl Engine {
    pub fn new(config: ValidatedConfig) -> Self {
        let registry = RuleRegistry::from_config(&config);
        let timeout = Some(config.timeout);
        Self {
            config,
            registry,
            timeout,
            language: None,
        }
    }

    /// Overrides the configured per-file budget; `None` disables it.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Forces the language of path inputs instead of using their extension.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Analyzes every input and aggregates the findings into one report.
    pub fn analyze_batch(&self, inputs: &[SourceInput]) -> Report {
        let run = || -> Vec<Finding> {
            inputs
                .par_iter()
                .flat_map_iter(|input| self.analyze_input(input))
                .collect()
        };

        let findings = match self.config.jobs {
            Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    warn!("failed to build a {jobs}-thread pool, using the global pool: {e}");
                    run()
                }
            },
            None => run(),
        };

        debug!(files = inputs.len(), findings = findings.len(), "batch analyzed");
        Report::from_findings(findings)
    }

    /// Findings of one input, or the single entry explaining why it could
    /// not be analyzed.
    pub fn analyze_input(&self, input: &SourceInput) -> Vec<Finding> {
        let file = input.file_id();
        let _span = debug_span!("analyze_file", file = %file).entered();
        let deadline = Deadline::from_timeout(self.timeout);

        let result = self
            .load(input)
            .and_then(|(text, language)| self.run_stages(&text, &file, language, &deadline));

        match result {
            Ok(findings) => {
                debug!(findings = findings.len(), "file analyzed");
                findings
            }
            Err(fault) => {
                warn!(file = %file, "{fault}");
                vec![fault.into_finding(file)]
            }
        }
    }

    /// Parses `input` and computes its metrics without running any rule.
    pub fn measure(&self, input: &SourceInput) -> Result<(SourceUnit, UnitMetrics), FileFault> {
        let (text, language) = self.load(input)?;
        let unit = parse_source(&text, input.file_id(), language)?;
        let metrics = extract_unit_metrics(&unit);
        Ok((unit, metrics))
    }

    fn load(&self, input: &SourceInput) -> Result<(String, Language), FileFault> {
        match input {
            SourceInput::Path(path) => {
                let text =
                    std::fs::read_to_string(path).map_err(|e| FileFault::Read(e.to_string()))?;
                let language = self.language.unwrap_or_else(|| Language::from_path(path));
                Ok((text, language))
            }
            SourceInput::Memory { language, text, .. } => Ok((text.clone(), *language)),
        }
    }

    fn run_stages(
        &self,
        text: &str,
        file: &FileId,
        language: Language,
        deadline: &Deadline,
    ) -> Result<Vec<Finding>, FileFault> {
        deadline.check()?;
        let unit = parse_source(text, file.clone(), language)?;

        deadline.check()?;
        let metrics = extract_unit_metrics(&unit);

        let rules = self.registry.as_dyn();
        let findings = evaluate_rules(&unit, &metrics, &self.config, &rules, deadline)?;
        Ok(findings)
    }
}

/// Runs `rules` over every declaration of `unit`, isolating each
/// (rule, declaration) evaluation.
pub fn evaluate_rules(
    unit: &SourceUnit,
    metrics: &UnitMetrics,
    config: &ValidatedConfig,
    rules: &[&dyn SmellRule],
    deadline: &Deadline,
) -> Result<Vec<Finding>, DeadlineExceeded> {
    let mut findings = Vec::new();

    for decl in &unit.declarations {
        deadline.check()?;
        let Some(ctx) = RuleContext::new(unit, decl.id, metrics, config) else {
            continue;
        };

        for rule in rules {
            deadline.check()?;
            findings.extend(run_isolated(*rule, &ctx));
        }
    }

    Ok(findings)
}

/// Evaluates one rule; an error or a panic becomes one `engine-fault` finding.
fn run_isolated(rule: &dyn SmellRule, ctx: &RuleContext<'_>) -> Vec<Finding> {
    let fault = match catch_unwind(AssertUnwindSafe(|| rule.evaluate(ctx))) {
        Ok(Ok(findings)) => return findings,
        Ok(Err(fault)) => fault,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            RuleFault::new(rule.id(), format!("panicked: {reason}"))
        }
    };

    warn!(
        rule = %fault.rule,
        declaration = %ctx.declaration().qualified_name,
        "{}",
        fault.message
    );
    vec![ctx.fault_finding(&fault)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use indoc::indoc;

    fn engine() -> Engine {
        Engine::new(ValidatedConfig::default())
    }

    #[test]
    fn test_memory_input_is_analyzed() {
        let input = SourceInput::memory(
            "order.js",
            Language::JavaScript,
            "function createOrder(street, city, state, zipCode, country, items, userId) {}",
        );
        let findings = engine().analyze_input(&input);

        let rules: Vec<_> = findings.iter().map(|f| f.rule).collect();
        assert!(rules.contains(&RuleId::PrimitiveObsession));
        assert!(rules.contains(&RuleId::LongParameterList));
        assert!(findings.iter().all(|f| f.file == FileId::new("order.js")));
    }

    #[test]
    fn test_syntax_error_becomes_one_parse_fault() {
        let input = SourceInput::memory("broken.js", Language::JavaScript, "function (");
        let findings = engine().analyze_input(&input);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, RuleId::ParseFault);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert!(findings[0].is_file_level());
    }

    #[test]
    fn test_unreadable_path_becomes_read_fault() {
        let input = SourceInput::Path(PathBuf::from("/definitely/not/here.js"));
        let findings = engine().analyze_input(&input);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, RuleId::ReadFault);
        assert_eq!(findings[0].file, FileId::new("/definitely/not/here.js"));
    }

    #[test]
    fn test_unknown_language_is_reported() {
        let input = SourceInput::memory("notes.txt", Language::Unknown, "hello");
        let findings = engine().analyze_input(&input);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, RuleId::ParseFault);
        assert!(findings[0].message.contains("unsupported language"));
    }

    #[test]
    fn test_zero_timeout_replaces_findings() {
        let input = SourceInput::memory(
            "slow.js",
            Language::JavaScript,
            indoc! {r#"
                function a(x, y, z) {}
                function b(x, y, z) {}
            "#},
        );
        let findings = engine()
            .with_timeout(Some(Duration::ZERO))
            .analyze_input(&input);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, RuleId::AnalysisTimeout);
    }

    struct PanickingRule;

    impl SmellRule for PanickingRule {
        fn id(&self) -> RuleId {
            RuleId::LongMethod
        }

        fn evaluate(&self, _ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleFault> {
            panic!("boom");
        }
    }

    #[test]
    fn test_panicking_rule_is_isolated() {
        let unit = parse_source(
            "function a() {}\nfunction b() {}",
            FileId::new("p.js"),
            Language::JavaScript,
        )
        .unwrap();
        let metrics = extract_unit_metrics(&unit);
        let config = ValidatedConfig::default();

        let findings = evaluate_rules(
            &unit,
            &metrics,
            &config,
            &[&PanickingRule],
            &Deadline::never(),
        )
        .unwrap();

        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.rule == RuleId::EngineFault));
        assert_eq!(
            findings[0].message,
            "rule `long-method` failed: panicked: boom"
        );
    }
}
