use super::{scaled_severity, RuleContext, SmellRule};
use crate::config::SmellThresholds;
use crate::core::{DeclarationKind, Finding, RefactoringCategory, RuleId};
use crate::errors::RuleFault;

#[derive(Debug, Clone)]
pub struct DeepNestingDetector {
    max_depth: u32,
}

impl DeepNestingDetector {
    pub fn new(thresholds: &SmellThresholds) -> Self {
        Self {
            max_depth: thresholds.deep_nesting,
        }
    }
}

impl SmellRule for DeepNestingDetector {
    fn id(&self) -> RuleId {
        RuleId::DeepNesting
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleFault> {
        let decl = ctx.declaration();
        if decl.kind == DeclarationKind::Class {
            return Ok(Vec::new());
        }
        let metrics = ctx.metrics(self.id())?;
        if metrics.nesting_depth <= self.max_depth {
            return Ok(Vec::new());
        }

        let message = format!(
            "{} '{}' nests conditionals and loops {} levels deep (threshold {})",
            decl.kind, decl.qualified_name, metrics.nesting_depth, self.max_depth
        );
        Ok(vec![ctx.finding(
            self.id(),
            scaled_severity(metrics.nesting_depth as f64, self.max_depth as f64),
            message,
            RefactoringCategory::IntroduceGuardClauses,
        )])
    }
}
