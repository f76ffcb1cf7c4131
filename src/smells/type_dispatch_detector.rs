use super::{scaled_severity, RuleContext, SmellRule};
use crate::config::SmellThresholds;
use crate::core::{Finding, RefactoringCategory, RuleId, SyntaxKind, SyntaxNode};
use crate::errors::RuleFault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    Switch,
    IfChain,
}

/// A switch, or the head of an if/else-if chain, that branches on one
/// subject compared against literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSite {
    pub kind: DispatchKind,
    pub subject: String,
    pub line: usize,
    pub branches: usize,
}

/// Every dispatch site of a body, in source order, regardless of length.
pub fn find_dispatch_sites(body: &[SyntaxNode]) -> Vec<DispatchSite> {
    let mut sites = Vec::new();
    for node in body {
        visit(node, None, &mut sites);
    }
    sites
}

/// `continues` is the subject of the if this node is the `else` branch of.
fn visit(node: &SyntaxNode, continues: Option<&str>, sites: &mut Vec<DispatchSite>) {
    match &node.kind {
        SyntaxKind::Switch {
            subject: Some(subject),
        } => {
            let branches = node
                .children
                .iter()
                .filter(|child| matches!(child.kind, SyntaxKind::Case { test: Some(_) }))
                .count();
            sites.push(DispatchSite {
                kind: DispatchKind::Switch,
                subject: subject.clone(),
                line: node.line,
                branches,
            });
        }
        SyntaxKind::If { test } => {
            let subject = test.as_ref().map(|t| t.subject.as_str());
            if let Some(subject) = subject.filter(|s| Some(*s) != continues) {
                sites.push(DispatchSite {
                    kind: DispatchKind::IfChain,
                    subject: subject.to_string(),
                    line: node.line,
                    branches: chain_length(node, subject),
                });
            }

            for child in &node.children {
                if child.kind == SyntaxKind::Else {
                    for branch in &child.children {
                        let link = match branch.kind {
                            SyntaxKind::If { .. } => subject,
                            _ => None,
                        };
                        visit(branch, link, sites);
                    }
                } else {
                    visit(child, None, sites);
                }
            }
            return;
        }
        _ => {}
    }

    for child in &node.children {
        visit(child, None, sites);
    }
}

fn chain_length(head: &SyntaxNode, subject: &str) -> usize {
    let mut length = 1;
    let mut current = head;

    while let Some(next) = else_if(current) {
        match &next.kind {
            SyntaxKind::If { test: Some(test) } if test.subject == subject => {
                length += 1;
                current = next;
            }
            _ => break,
        }
    }

    length
}

fn else_if(node: &SyntaxNode) -> Option<&SyntaxNode> {
    node.children
        .iter()
        .find(|child| child.kind == SyntaxKind::Else)
        .and_then(|branch| branch.children.first())
        .filter(|first| matches!(first.kind, SyntaxKind::If { .. }))
}

#[derive(Debug, Clone)]
pub struct TypeDispatchDetector {
    min_branches: usize,
}

impl TypeDispatchDetector {
    pub fn new(thresholds: &SmellThresholds) -> Self {
        Self {
            min_branches: thresholds.type_dispatch_branches,
        }
    }
}

impl SmellRule for TypeDispatchDetector {
    fn id(&self) -> RuleId {
        RuleId::TypeCodeDispatch
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleFault> {
        let decl = ctx.declaration();

        let findings = find_dispatch_sites(&decl.body)
            .into_iter()
            .filter(|site| site.branches >= self.min_branches)
            .map(|site| {
                let construct = match site.kind {
                    DispatchKind::Switch => "switch",
                    DispatchKind::IfChain => "if/else-if chain",
                };
                let message = format!(
                    "{} in '{}' dispatches on '{}' over {} literal values at line {}",
                    construct, decl.qualified_name, site.subject, site.branches, site.line
                );
                ctx.finding(
                    self.id(),
                    scaled_severity(site.branches as f64, self.min_branches as f64),
                    message,
                    RefactoringCategory::ReplaceTypeCodeWithPolymorphism,
                )
            })
            .collect();

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use crate::smells::test_support::Fixture;
    use indoc::indoc;

    fn detector() -> TypeDispatchDetector {
        TypeDispatchDetector::new(&SmellThresholds::default())
    }

    #[test]
    fn test_five_branch_if_chain_fires() {
        let fixture = Fixture::parse(indoc! {r#"
            class PaymentProcessor {
                process(payment) {
                    if (payment.type === 'credit') {
                        return this.credit(payment);
                    } else if (payment.type === 'debit') {
                        return this.debit(payment);
                    } else if (payment.type === 'paypal') {
                        return this.paypal(payment);
                    } else if (payment.type === 'crypto') {
                        return this.crypto(payment);
                    } else if (payment.type === 'bank') {
                        return this.bank(payment);
                    } else {
                        throw new Error('unsupported');
                    }
                }
            }
        "#});

        let findings = fixture.run(&detector());
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].suggested_category,
            Some(RefactoringCategory::ReplaceTypeCodeWithPolymorphism)
        );
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(
            findings[0].message,
            "if/else-if chain in 'PaymentProcessor.process' dispatches on 'payment.type' \
             over 5 literal values at line 3"
        );
    }

    #[test]
    fn test_switch_on_user_type_fires() {
        let fixture = Fixture::parse(indoc! {r#"
            function calculatePrice(userType, price) {
                switch (userType) {
                    case 'regular': return price;
                    case 'premium': return price * 0.9;
                    case 'vip': return price * 0.8;
                    case 'employee': return price * 0.5;
                    default: return price;
                }
            }
        "#});

        let findings = fixture.run(&detector());
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.starts_with("switch in 'calculatePrice'"));
    }

    #[test]
    fn test_short_or_mixed_chains_do_not_fire() {
        let fixture = Fixture::parse(indoc! {r#"
            function f(kind, mode) {
                if (kind === 'a') {
                } else if (kind === 'b') {
                } else if (mode === 'c') {
                } else if (kind === 'd') {
                }
                switch (kind) {
                    case 'a': break;
                    case 'b': break;
                    case other: break;
                    default: break;
                }
            }
        "#});
        assert!(fixture.run(&detector()).is_empty());
    }

    #[test]
    fn test_chain_sites_are_found_once_each() {
        let fixture = Fixture::parse(indoc! {r#"
            function f(kind, mode) {
                if (kind === 'a') {
                } else if (kind === 'b') {
                } else if (mode === 1) {
                } else if (mode === 2) {
                }
            }
        "#});
        let sites = find_dispatch_sites(&fixture.unit.declarations[0].body);
        let summary: Vec<_> = sites
            .iter()
            .map(|s| (s.subject.as_str(), s.branches, s.line))
            .collect();
        assert_eq!(summary, vec![("kind", 2, 2), ("mode", 2, 4)]);
    }
}
