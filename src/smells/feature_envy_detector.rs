use super::{RuleContext, SmellRule};
use crate::config::SmellThresholds;
use crate::core::{Finding, RefactoringCategory, RuleId, Severity};
use crate::errors::RuleFault;
use crate::metrics::external_receivers;

const HIGH_SEVERITY_RATIO: f64 = 0.9;
/// External accesses needed before the ratio alone can raise severity.
const HIGH_SEVERITY_MIN_EXTERNAL: usize = 3;

/// A method that reads another object's data more than its own.
#[derive(Debug, Clone)]
pub struct FeatureEnvyDetector {
    ratio_threshold: f64,
}

impl FeatureEnvyDetector {
    pub fn new(thresholds: &SmellThresholds) -> Self {
        Self {
            ratio_threshold: thresholds.feature_envy_ratio,
        }
    }
}

impl SmellRule for FeatureEnvyDetector {
    fn id(&self) -> RuleId {
        RuleId::FeatureEnvy
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleFault> {
        let decl = ctx.declaration();
        if !decl.is_method() {
            return Ok(Vec::new());
        }
        let metrics = ctx.metrics(self.id())?;

        let ratio = metrics.external_access_ratio();
        let own = metrics.own_member_access_count;
        let external = metrics.external_member_access_count;
        if ratio <= self.ratio_threshold || own >= external {
            return Ok(Vec::new());
        }

        // Most accessed receiver; ties go to the first name.
        let envied = external_receivers(decl)
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)));
        let target = match envied {
            Some((name, 1)) => format!("'{name}' (1 access)"),
            Some((name, count)) => format!("'{name}' ({count} accesses)"),
            None => "external data".to_string(),
        };

        let severity = if ratio >= HIGH_SEVERITY_RATIO && external >= HIGH_SEVERITY_MIN_EXTERNAL {
            Severity::High
        } else {
            Severity::Medium
        };
        let message = format!(
            "Method '{}' uses {} more than its own state: {} external vs {} own accesses (ratio {:.2})",
            decl.qualified_name, target, external, own, ratio
        );

        Ok(vec![ctx.finding(
            self.id(),
            severity,
            message,
            RefactoringCategory::MoveMethod,
        )])
    }
}
