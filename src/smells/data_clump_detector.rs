use super::{scaled_severity, RuleContext, SmellRule};
use crate::config::SmellThresholds;
use crate::core::{Declaration, DeclarationKind, Finding, ParameterShape, RefactoringCategory, RuleId};
use crate::errors::RuleFault;

/// Parameters that travel together through several declarations of a file.
///
/// Each pair of declarations is reported once, on the earlier one, with the
/// later one as a related site.
#[derive(Debug, Clone)]
pub struct DataClumpDetector {
    min_shared: usize,
}

impl DataClumpDetector {
    pub fn new(thresholds: &SmellThresholds) -> Self {
        Self {
            min_shared: thresholds.data_clump_min_shared_params,
        }
    }
}

impl SmellRule for DataClumpDetector {
    fn id(&self) -> RuleId {
        RuleId::DataClump
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleFault> {
        let decl = ctx.declaration();
        if decl.kind == DeclarationKind::Class {
            return Ok(Vec::new());
        }

        let own = comparable_names(decl);
        if own.len() < self.min_shared {
            return Ok(Vec::new());
        }

        let mut findings = Vec::new();
        let later = ctx
            .unit()
            .functions()
            .filter(|other| other.id > decl.id);

        for other in later {
            let theirs = comparable_names(other);
            let shared = longest_common_subsequence(&own, &theirs);
            if shared.len() < self.min_shared {
                continue;
            }

            let names: Vec<&str> = shared.iter().map(|i| own[*i]).collect();
            let mut message = format!(
                "parameters ({}) appear together in '{}' (line {}) and '{}' (line {})",
                names.join(", "),
                decl.qualified_name,
                decl.span.start_line,
                other.qualified_name,
                other.span.start_line,
            );
            if let Some(group) = common_group(ctx, &names) {
                message.push_str(&format!("; they form the '{group}' group"));
            }

            let mut finding = ctx.finding(
                self.id(),
                scaled_severity(names.len() as f64, self.min_shared as f64),
                message,
                RefactoringCategory::ExtractParameterObject,
            );
            finding.related.extend(ctx.related_site(other.id));
            findings.push(finding);
        }

        Ok(findings)
    }
}

/// Plain parameter names; destructured parameters have no single name.
fn comparable_names(decl: &Declaration) -> Vec<&str> {
    decl.parameters
        .iter()
        .filter(|param| param.shape != ParameterShape::Destructured)
        .map(|param| param.name.as_str())
        .collect()
}

fn common_group<'a>(ctx: &RuleContext<'a>, names: &[&str]) -> Option<&'a str> {
    let grouping = &ctx.config().grouping;
    let first = grouping.group_of(names.first()?)?;
    names
        .iter()
        .all(|name| grouping.group_of(name) == Some(first))
        .then_some(first)
}

/// Indices into `left` of a longest common subsequence of the two name
/// lists, compared case-insensitively.
pub fn longest_common_subsequence(left: &[&str], right: &[&str]) -> Vec<usize> {
    let (n, m) = (left.len(), right.len());
    let mut table = vec![vec![0usize; m + 1]; n + 1];

    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if left[i].eq_ignore_ascii_case(right[j]) {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut shared = Vec::with_capacity(table[0][0]);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if left[i].eq_ignore_ascii_case(right[j]) {
            shared.push(i);
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    shared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use crate::smells::test_support::Fixture;
    use indoc::indoc;

    fn detector() -> DataClumpDetector {
        DataClumpDetector::new(&SmellThresholds::default())
    }

    #[test]
    fn test_lcs_preserves_order() {
        let left = ["street", "city", "state", "zipCode", "country", "items"];
        let right = ["userId", "street", "city", "state", "zipcode", "country"];
        assert_eq!(longest_common_subsequence(&left, &right), vec![0, 1, 2, 3, 4]);

        let reversed = ["country", "zipCode", "state"];
        assert_eq!(longest_common_subsequence(&left, &reversed).len(), 1);
        assert!(longest_common_subsequence(&left, &[]).is_empty());
    }

    #[test]
    fn test_address_clump_reported_once_per_pair() {
        let fixture = Fixture::parse(indoc! {r#"
            function createOrder(street, city, state, zipCode, country, items, userId) {
                return { items, userId };
            }

            function updateUserAddress(userId, street, city, state, zipCode, country) {
                return userId;
            }
        "#});

        let findings = fixture.run(&detector());
        assert_eq!(findings.len(), 1);

        let finding = &findings[0];
        assert_eq!(finding.target.name, "createOrder");
        assert_eq!(finding.severity, Severity::Medium);
        assert_eq!(finding.related.len(), 1);
        assert_eq!(finding.related[0].name, "updateUserAddress");
        assert_eq!(finding.related[0].start_line, 5);
        assert_eq!(
            finding.message,
            "parameters (street, city, state, zipCode, country) appear together in \
             'createOrder' (line 1) and 'updateUserAddress' (line 5); \
             they form the 'address' group"
        );
    }

    #[test]
    fn test_three_way_clump_reports_each_pair() {
        let fixture = Fixture::parse(indoc! {r#"
            function a(x, y, z) {}
            function b(x, y, z) {}
            class C { c(x, y, z) {} }
        "#});

        let findings = fixture.run(&detector());
        let pairs: Vec<_> = findings
            .iter()
            .map(|f| (f.target.name.as_str(), f.related[0].name.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "b"), ("a", "C.c"), ("b", "C.c")]);
    }

    #[test]
    fn test_below_threshold_is_ignored() {
        let fixture = Fixture::parse("function a(x, y, q) {}\nfunction b(x, y, r) {}");
        assert!(fixture.run(&detector()).is_empty());
    }
}
