use super::{scaled_severity, RuleContext, SmellRule};
use crate::config::SmellThresholds;
use crate::core::{DeclarationKind, Finding, RefactoringCategory, RuleId};
use crate::errors::RuleFault;

/// Primitive parameters that belong to one semantic group, e.g.
/// `(street, city, state, zipCode)` instead of an `Address`.
#[derive(Debug, Clone)]
pub struct PrimitiveObsessionDetector {
    min_params: usize,
}

impl PrimitiveObsessionDetector {
    pub fn new(thresholds: &SmellThresholds) -> Self {
        Self {
            min_params: thresholds.primitive_obsession_param_count,
        }
    }
}

impl SmellRule for PrimitiveObsessionDetector {
    fn id(&self) -> RuleId {
        RuleId::PrimitiveObsession
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleFault> {
        let decl = ctx.declaration();
        if decl.kind == DeclarationKind::Class {
            return Ok(Vec::new());
        }
        let metrics = ctx.metrics(self.id())?;

        if metrics.param_count < self.min_params
            || !decl.parameters.iter().all(|p| p.is_primitive_typed())
        {
            return Ok(Vec::new());
        }

        let mut groups: Vec<(&str, Vec<&str>)> = ctx
            .config()
            .grouping
            .classify(decl.parameter_names())
            .into_iter()
            .filter(|(_, members)| members.len() >= 2)
            .collect();
        if groups.is_empty() {
            return Ok(Vec::new());
        }
        groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(b.0)));

        let described: Vec<String> = groups
            .iter()
            .map(|(group, members)| {
                format!(
                    "'{}' group of {} ({})",
                    group,
                    members.len(),
                    members.join(", ")
                )
            })
            .collect();
        let message = format!(
            "{} '{}' takes {} primitive parameters; {} could be a value object",
            decl.kind,
            decl.qualified_name,
            metrics.param_count,
            described.join("; ")
        );

        Ok(vec![ctx.finding(
            self.id(),
            scaled_severity(metrics.param_count as f64, self.min_params as f64),
            message,
            RefactoringCategory::IntroduceValueObject,
        )])
    }
}
