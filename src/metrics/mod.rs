//! Per-declaration structural metrics.
//!
//! Metrics are computed once per declaration from its lowered body and never
//! change afterwards. Nested function and class bodies are opaque: they get
//! their own metrics as separate declarations.

mod access;
mod complexity;

pub use access::{external_receivers, AccessCounts};

use crate::core::{Declaration, DeclarationId, DeclarationKind, SourceUnit};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricName {
    CyclomaticComplexity,
    NestingDepth,
    ParamCount,
    StatementCount,
    ExternalMemberAccessCount,
    OwnMemberAccessCount,
    ExternalAccessRatio,
    LiteralCount,
}

impl MetricName {
    pub const ALL: [MetricName; 8] = [
        MetricName::CyclomaticComplexity,
        MetricName::NestingDepth,
        MetricName::ParamCount,
        MetricName::StatementCount,
        MetricName::ExternalMemberAccessCount,
        MetricName::OwnMemberAccessCount,
        MetricName::ExternalAccessRatio,
        MetricName::LiteralCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::CyclomaticComplexity => "cyclomaticComplexity",
            MetricName::NestingDepth => "nestingDepth",
            MetricName::ParamCount => "paramCount",
            MetricName::StatementCount => "statementCount",
            MetricName::ExternalMemberAccessCount => "externalMemberAccessCount",
            MetricName::OwnMemberAccessCount => "ownMemberAccessCount",
            MetricName::ExternalAccessRatio => "externalAccessRatio",
            MetricName::LiteralCount => "literalCount",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MetricName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Metrics {
    pub cyclomatic_complexity: u32,
    pub nesting_depth: u32,
    pub param_count: usize,
    pub statement_count: usize,
    pub external_member_access_count: usize,
    pub own_member_access_count: usize,
    pub literal_count: usize,
}

impl Default for Metrics {
    /// Metrics of a declaration with an empty body.
    fn default() -> Self {
        Self {
            cyclomatic_complexity: 1,
            nesting_depth: 0,
            param_count: 0,
            statement_count: 0,
            external_member_access_count: 0,
            own_member_access_count: 0,
            literal_count: 0,
        }
    }
}

impl Metrics {
    /// `external / max(1, external + own)`.
    pub fn external_access_ratio(&self) -> f64 {
        let external = self.external_member_access_count;
        let total = (external + self.own_member_access_count).max(1);
        external as f64 / total as f64
    }

    pub fn get(&self, name: MetricName) -> f64 {
        match name {
            MetricName::CyclomaticComplexity => self.cyclomatic_complexity as f64,
            MetricName::NestingDepth => self.nesting_depth as f64,
            MetricName::ParamCount => self.param_count as f64,
            MetricName::StatementCount => self.statement_count as f64,
            MetricName::ExternalMemberAccessCount => self.external_member_access_count as f64,
            MetricName::OwnMemberAccessCount => self.own_member_access_count as f64,
            MetricName::ExternalAccessRatio => self.external_access_ratio(),
            MetricName::LiteralCount => self.literal_count as f64,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricName, f64)> + '_ {
        MetricName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }
}

/// Metrics for every declaration of one [`SourceUnit`], keyed by declaration id.
#[derive(Clone, Debug, Default)]
pub struct UnitMetrics {
    by_declaration: BTreeMap<DeclarationId, Metrics>,
}

impl UnitMetrics {
    pub fn get(&self, id: DeclarationId) -> Option<&Metrics> {
        self.by_declaration.get(&id)
    }

    pub fn value(&self, id: DeclarationId, name: MetricName) -> Option<f64> {
        self.get(id).map(|metrics| metrics.get(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclarationId, &Metrics)> {
        self.by_declaration.iter().map(|(id, metrics)| (*id, metrics))
    }

    pub fn len(&self) -> usize {
        self.by_declaration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_declaration.is_empty()
    }
}

impl FromIterator<(DeclarationId, Metrics)> for UnitMetrics {
    fn from_iter<I: IntoIterator<Item = (DeclarationId, Metrics)>>(iter: I) -> Self {
        Self {
            by_declaration: iter.into_iter().collect(),
        }
    }
}

pub fn extract_metrics(declaration: &Declaration) -> Metrics {
    if declaration.kind == DeclarationKind::Class {
        return Metrics::default();
    }

    let body = &declaration.body;
    let access = AccessCounts::of(declaration);

    Metrics {
        cyclomatic_complexity: complexity::cyclomatic_complexity(body),
        nesting_depth: complexity::nesting_depth(body),
        param_count: declaration.parameters.len(),
        statement_count: complexity::statement_count(body),
        external_member_access_count: access.external,
        own_member_access_count: access.own,
        literal_count: complexity::literal_count(body),
    }
}

pub fn extract_unit_metrics(unit: &SourceUnit) -> UnitMetrics {
    unit.declarations
        .iter()
        .map(|decl| (decl.id, extract_metrics(decl)))
        .collect()
}

/// Serializable metrics of one declaration, as printed by `smellmap metrics`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRecord {
    pub file: String,
    pub declaration_name: String,
    pub kind: DeclarationKind,
    pub start_line: usize,
    pub end_line: usize,
    pub metrics: BTreeMap<MetricName, f64>,
}

pub fn metrics_records(unit: &SourceUnit, metrics: &UnitMetrics) -> Vec<MetricsRecord> {
    unit.declarations
        .iter()
        .filter_map(|decl| {
            let values = metrics.get(decl.id)?;
            Some(MetricsRecord {
                file: unit.file.as_str().to_string(),
                declaration_name: decl.qualified_name.clone(),
                kind: decl.kind,
                start_line: decl.span.start_line,
                end_line: decl.span.end_line,
                metrics: values.iter().collect(),
            })
        })
        .collect()
}
