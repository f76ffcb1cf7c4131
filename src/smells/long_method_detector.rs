use super::{scaled_severity, RuleContext, SmellRule};
use crate::config::SmellThresholds;
use crate::core::{DeclarationKind, Finding, RefactoringCategory, RuleId, Severity};
use crate::errors::RuleFault;

#[derive(Debug, Clone)]
pub struct LongMethodDetector {
    max_statements: usize,
    max_complexity: u32,
}

impl LongMethodDetector {
    pub fn new(thresholds: &SmellThresholds) -> Self {
        Self {
            max_statements: thresholds.long_method_statements,
            max_complexity: thresholds.long_method_complexity,
        }
    }
}

impl SmellRule for LongMethodDetector {
    fn id(&self) -> RuleId {
        RuleId::LongMethod
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleFault> {
        let decl = ctx.declaration();
        if decl.kind == DeclarationKind::Class {
            return Ok(Vec::new());
        }
        let metrics = ctx.metrics(self.id())?;

        let mut reasons = Vec::new();
        let mut severity = Severity::Medium;

        if metrics.statement_count > self.max_statements {
            reasons.push(format!(
                "{} statements (threshold {})",
                metrics.statement_count, self.max_statements
            ));
            severity = severity.max(scaled_severity(
                metrics.statement_count as f64,
                self.max_statements as f64,
            ));
        }
        if metrics.cyclomatic_complexity > self.max_complexity {
            reasons.push(format!(
                "cyclomatic complexity {} (threshold {})",
                metrics.cyclomatic_complexity, self.max_complexity
            ));
            severity = severity.max(scaled_severity(
                metrics.cyclomatic_complexity as f64,
                self.max_complexity as f64,
            ));
        }

        if reasons.is_empty() {
            return Ok(Vec::new());
        }

        let message = format!(
            "{} '{}' is too long: {}",
            decl.kind,
            decl.qualified_name,
            reasons.join(" and ")
        );
        Ok(vec![ctx.finding(
            self.id(),
            severity,
            message,
            RefactoringCategory::ExtractFunction,
        )])
    }
}
