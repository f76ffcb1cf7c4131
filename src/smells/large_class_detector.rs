use super::{scaled_severity, RuleContext, SmellRule};
use crate::config::SmellThresholds;
use crate::core::{DeclarationKind, Finding, RefactoringCategory, RuleId};
use crate::errors::RuleFault;

/// A class carrying too many responsibilities, measured by its method count.
#[derive(Debug, Clone)]
pub struct LargeClassDetector {
    max_methods: usize,
}

impl LargeClassDetector {
    pub fn new(thresholds: &SmellThresholds) -> Self {
        Self {
            max_methods: thresholds.large_class_methods,
        }
    }
}

impl SmellRule for LargeClassDetector {
    fn id(&self) -> RuleId {
        RuleId::LargeClass
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Finding>, RuleFault> {
        let decl = ctx.declaration();
        if decl.kind != DeclarationKind::Class {
            return Ok(Vec::new());
        }

        let methods = ctx
            .unit()
            .children_of(decl.id)
            .filter(|child| child.is_method())
            .count();
        if methods <= self.max_methods {
            return Ok(Vec::new());
        }

        let message = format!(
            "Class '{}' defines {} methods (threshold {})",
            decl.qualified_name, methods, self.max_methods
        );
        Ok(vec![ctx.finding(
            self.id(),
            scaled_severity(methods as f64, self.max_methods as f64),
            message,
            RefactoringCategory::ExtractClass,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smells::test_support::Fixture;

    fn class_with(methods: usize) -> String {
        let body: String = (0..methods).map(|i| format!("  m{i}() {{}}\n")).collect();
        format!("class UserManager {{\n{body}}}\n")
    }

    #[test]
    fn test_eleven_methods_fire() {
        let fixture = Fixture::parse(&class_with(11));
        let findings = fixture.run(&LargeClassDetector::new(&SmellThresholds::default()));

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].target.name, "UserManager");
        assert_eq!(
            findings[0].message,
            "Class 'UserManager' defines 11 methods (threshold 10)"
        );
    }

    #[test]
    fn test_ten_methods_do_not_fire() {
        let fixture = Fixture::parse(&class_with(10));
        assert!(fixture
            .run(&LargeClassDetector::new(&SmellThresholds::default()))
            .is_empty());
    }
}
