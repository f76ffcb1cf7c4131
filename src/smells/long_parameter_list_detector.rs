use super::{scaled_severity, RuleContext, SmellRule};
use crate::config::SmellThresholds;
use crate::core::{DeclarationKind, Finding, RefactoringCategory, RuleId};
use crate::errors::RuleFault;

#[derive(Debug, Clone)]
pub struct LongParameterListDetector {
    max_params: usize,
}

impl LongParameterListDetector {
    pub fn new(thresholds: &SmellThresholds) -> Self {
        Self {
            max_params: thresholds.long_parameter_list,
        }
    }
}

impl SmellRule for LongParameterListDetector {
    fn id(&self) -> RuleId {
        RuleId::LongParameterList
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleFault> {
        let decl = ctx.declaration();
        if decl.kind == DeclarationKind::Class {
            return Ok(Vec::new());
        }
        let metrics = ctx.metrics(self.id())?;
        if metrics.param_count <= self.max_params {
            return Ok(Vec::new());
        }

        let message = format!(
            "{} '{}' has {} parameters (threshold {})",
            decl.kind, decl.qualified_name, metrics.param_count, self.max_params
        );
        Ok(vec![ctx.finding(
            self.id(),
            scaled_severity(metrics.param_count as f64, self.max_params as f64),
            message,
            RefactoringCategory::ExtractParameterObject,
        )])
    }
}
