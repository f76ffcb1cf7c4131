//! Aggregates findings into the stable, serializable report.

use crate::core::{Finding, RefactoringCategory, RuleId, Severity};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;

/// One record of the report. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub file: String,
    pub rule_id: RuleId,
    pub severity: Severity,
    pub declaration_name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub message: String,
    pub suggested_category: Option<RefactoringCategory>,
}

impl From<&Finding> for ReportEntry {
    fn from(finding: &Finding) -> Self {
        Self {
            file: finding.file.as_str().to_string(),
            rule_id: finding.rule,
            severity: finding.severity,
            declaration_name: finding.target.name.clone(),
            start_line: finding.target.span.start_line,
            end_line: finding.target.span.end_line,
            message: finding.message.clone(),
            suggested_category: finding.suggested_category,
        }
    }
}

/// Deduplicated findings in report order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Sorts by (file, start line, severity descending, rule id), with the
    /// remaining fields as tie-breakers, then drops exact duplicates
    /// (same rule, file, declaration span and message).
    pub fn from_findings(findings: impl IntoIterator<Item = Finding>) -> Self {
        let mut findings: Vec<Finding> = findings.into_iter().collect();
        findings.sort_by(report_order);

        let mut seen = HashSet::new();
        let entries = findings
            .iter()
            .filter(|f| {
                seen.insert((
                    f.rule,
                    f.file.clone(),
                    f.target.span,
                    f.message.clone(),
                ))
            })
            .map(ReportEntry::from)
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_of(&self, rule: RuleId) -> usize {
        self.entries.iter().filter(|e| e.rule_id == rule).count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn report_order(a: &Finding, b: &Finding) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

#[allow(clippy::type_complexity)]
fn sort_key(
    f: &Finding,
) -> (
    &str,
    usize,
    Reverse<Severity>,
    &'static str,
    usize,
    &str,
    &str,
    Option<&'static str>,
    (usize, usize),
) {
    (
        f.file.as_str(),
        f.target.span.start_line,
        Reverse(f.severity),
        f.rule.as_str(),
        f.target.span.end_line,
        f.target.name.as_str(),
        f.message.as_str(),
        f.suggested_category.map(|c| c.as_str()),
        (f.target.span.start_byte, f.target.span.end_byte),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeclarationRef, FileId, Span};
    use pretty_assertions::assert_eq;

    fn finding(file: &str, rule: RuleId, severity: Severity, line: usize, message: &str) -> Finding {
        Finding {
            file: FileId::new(file),
            rule,
            severity,
            target: DeclarationRef {
                id: None,
                name: "target".to_string(),
                span: Span::new(line, line + 3, 0, 10),
            },
            message: message.to_string(),
            suggested_category: None,
            related: Vec::new(),
        }
    }

    #[test]
    fn test_sorted_by_file_line_severity_rule() {
        let report = Report::from_findings(vec![
            finding("b.js", RuleId::LongMethod, Severity::Medium, 1, "m"),
            finding("a.js", RuleId::LongMethod, Severity::Medium, 5, "m"),
            finding("a.js", RuleId::FeatureEnvy, Severity::Medium, 2, "m"),
            finding("a.js", RuleId::DataClump, Severity::Medium, 2, "m"),
            finding("a.js", RuleId::TypeCodeDispatch, Severity::High, 2, "m"),
        ]);

        let order: Vec<_> = report
            .entries()
            .iter()
            .map(|e| (e.file.as_str(), e.start_line, e.rule_id))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.js", 2, RuleId::TypeCodeDispatch),
                ("a.js", 2, RuleId::DataClump),
                ("a.js", 2, RuleId::FeatureEnvy),
                ("a.js", 5, RuleId::LongMethod),
                ("b.js", 1, RuleId::LongMethod),
            ]
        );
    }

    #[test]
    fn test_exact_duplicates_are_dropped() {
        let dup = finding("a.js", RuleId::LongMethod, Severity::Medium, 1, "too long");
        let report = Report::from_findings(vec![
            dup.clone(),
            dup.clone(),
            finding("a.js", RuleId::LongMethod, Severity::Medium, 1, "different"),
        ]);
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_json_shape_and_idempotence() {
        let findings = vec![finding(
            "a.js",
            RuleId::DataClump,
            Severity::High,
            1,
            "parameters (a, b, c) appear together",
        )];

        let first = Report::from_findings(findings.clone()).to_json().unwrap();
        let second = Report::from_findings(findings).to_json().unwrap();
        assert_eq!(first, second);

        let expected = r#"[
  {
    "file": "a.js",
    "ruleId": "data-clump",
    "severity": "high",
    "declarationName": "target",
    "startLine": 1,
    "endLine": 4,
    "message": "parameters (a, b, c) appear together",
    "suggestedCategory": null
  }
]"#;
        assert_eq!(first, expected);
    }

    #[test]
    fn test_empty_report_serializes_as_empty_array() {
        let report = Report::from_findings(Vec::new());
        assert!(report.is_empty());
        assert_eq!(report.to_json().unwrap(), "[]");
    }
}
