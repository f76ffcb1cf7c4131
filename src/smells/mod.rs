//! Smell rules.
//!
//! Every rule is an independent evaluator over one declaration and its
//! metrics. Rules never see each other's findings, so the order they run in
//! only matters for reproducible logs; the report imposes the final order.

mod data_clump_detector;
mod deep_nesting_detector;
mod feature_envy_detector;
mod large_class_detector;
mod long_method_detector;
mod long_parameter_list_detector;
mod primitive_obsession_detector;
mod type_dispatch_detector;

pub use data_clump_detector::{longest_common_subsequence, DataClumpDetector};
pub use deep_nesting_detector::DeepNestingDetector;
pub use feature_envy_detector::FeatureEnvyDetector;
pub use large_class_detector::LargeClassDetector;
pub use long_method_detector::LongMethodDetector;
pub use long_parameter_list_detector::LongParameterListDetector;
pub use primitive_obsession_detector::PrimitiveObsessionDetector;
pub use type_dispatch_detector::{find_dispatch_sites, DispatchKind, DispatchSite, TypeDispatchDetector};

use crate::config::{SmellThresholds, ValidatedConfig};
use crate::core::{
    Declaration, DeclarationId, DeclarationRef, Finding, RefactoringCategory, RelatedSite, RuleId,
    Severity, SourceUnit,
};
use crate::errors::RuleFault;
use crate::metrics::{Metrics, UnitMetrics};

/// A smell evaluator.
///
/// Implementations must be stateless: the same context always yields the
/// same findings, and one registry is shared by every worker thread.
pub trait SmellRule: Send + Sync {
    fn id(&self) -> RuleId;
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleFault>;
}

/// What a rule may look at while evaluating one declaration.
///
/// Findings can only be built through [`RuleContext::finding`], which binds
/// them to the declaration under evaluation, and related sites only resolve
/// within the same unit.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    unit: &'a SourceUnit,
    declaration: &'a Declaration,
    metrics: &'a UnitMetrics,
    config: &'a ValidatedConfig,
}

impl<'a> RuleContext<'a> {
    /// `None` when `id` is not a declaration of `unit`.
    pub fn new(
        unit: &'a SourceUnit,
        id: DeclarationId,
        metrics: &'a UnitMetrics,
        config: &'a ValidatedConfig,
    ) -> Option<Self> {
        let declaration = unit.declaration(id)?;
        Some(Self {
            unit,
            declaration,
            metrics,
            config,
        })
    }

    pub fn unit(&self) -> &'a SourceUnit {
        self.unit
    }

    pub fn declaration(&self) -> &'a Declaration {
        self.declaration
    }

    pub fn config(&self) -> &'a ValidatedConfig {
        self.config
    }

    pub fn metrics(&self, rule: RuleId) -> Result<&'a Metrics, RuleFault> {
        self.metrics.get(self.declaration.id).ok_or_else(|| {
            RuleFault::new(
                rule,
                format!("no metrics for '{}'", self.declaration.qualified_name),
            )
        })
    }

    pub fn finding(
        &self,
        rule: RuleId,
        severity: Severity,
        message: impl Into<String>,
        category: RefactoringCategory,
    ) -> Finding {
        Finding {
            file: self.unit.file.clone(),
            rule,
            severity,
            target: DeclarationRef::of(self.declaration),
            message: message.into(),
            suggested_category: Some(category),
            related: Vec::new(),
        }
    }

    /// The `engine-fault` entry standing in for a rule that failed here.
    pub fn fault_finding(&self, fault: &RuleFault) -> Finding {
        Finding {
            file: self.unit.file.clone(),
            rule: RuleId::EngineFault,
            severity: Severity::High,
            target: DeclarationRef::of(self.declaration),
            message: fault.to_string(),
            suggested_category: None,
            related: Vec::new(),
        }
    }

    pub fn related_site(&self, id: DeclarationId) -> Option<RelatedSite> {
        self.unit.declaration(id).map(|decl| RelatedSite {
            id: decl.id,
            name: decl.qualified_name.clone(),
            start_line: decl.span.start_line,
        })
    }
}

/// `High` once the measured value reaches twice its threshold.
pub fn scaled_severity(value: f64, threshold: f64) -> Severity {
    if value >= threshold * 2.0 {
        Severity::High
    } else {
        Severity::Medium
    }
}

/// The fixed set of smell rules.
#[derive(Debug, Clone)]
pub enum Rule {
    LongMethod(LongMethodDetector),
    PrimitiveObsession(PrimitiveObsessionDetector),
    FeatureEnvy(FeatureEnvyDetector),
    TypeCodeDispatch(TypeDispatchDetector),
    DataClump(DataClumpDetector),
    LongParameterList(LongParameterListDetector),
    DeepNesting(DeepNestingDetector),
    LargeClass(LargeClassDetector),
}

impl Rule {
    /// `None` for fault ids, which are not rules.
    pub fn for_id(id: RuleId, thresholds: &SmellThresholds) -> Option<Rule> {
        let rule = match id {
            RuleId::LongMethod => Rule::LongMethod(LongMethodDetector::new(thresholds)),
            RuleId::PrimitiveObsession => {
                Rule::PrimitiveObsession(PrimitiveObsessionDetector::new(thresholds))
            }
            RuleId::FeatureEnvy => Rule::FeatureEnvy(FeatureEnvyDetector::new(thresholds)),
            RuleId::TypeCodeDispatch => {
                Rule::TypeCodeDispatch(TypeDispatchDetector::new(thresholds))
            }
            RuleId::DataClump => Rule::DataClump(DataClumpDetector::new(thresholds)),
            RuleId::LongParameterList => {
                Rule::LongParameterList(LongParameterListDetector::new(thresholds))
            }
            RuleId::DeepNesting => Rule::DeepNesting(DeepNestingDetector::new(thresholds)),
            RuleId::LargeClass => Rule::LargeClass(LargeClassDetector::new(thresholds)),
            RuleId::EngineFault
            | RuleId::ParseFault
            | RuleId::ReadFault
            | RuleId::AnalysisTimeout => return None,
        };
        Some(rule)
    }

    fn as_smell_rule(&self) -> &dyn SmellRule {
        match self {
            Rule::LongMethod(rule) => rule,
            Rule::PrimitiveObsession(rule) => rule,
            Rule::FeatureEnvy(rule) => rule,
            Rule::TypeCodeDispatch(rule) => rule,
            Rule::DataClump(rule) => rule,
            Rule::LongParameterList(rule) => rule,
            Rule::DeepNesting(rule) => rule,
            Rule::LargeClass(rule) => rule,
        }
    }
}

impl SmellRule for Rule {
    fn id(&self) -> RuleId {
        self.as_smell_rule().id()
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleFault> {
        self.as_smell_rule().evaluate(ctx)
    }
}

/// Enabled rules in their fixed registration order. Read-only after construction.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    pub fn from_config(config: &ValidatedConfig) -> Self {
        let rules = RuleId::SMELLS
            .into_iter()
            .filter(|id| config.is_enabled(*id))
            .filter_map(|id| Rule::for_id(id, &config.thresholds))
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(SmellRule::id).collect()
    }

    pub fn as_dyn(&self) -> Vec<&dyn SmellRule> {
        self.rules.iter().map(|rule| rule as &dyn SmellRule).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
