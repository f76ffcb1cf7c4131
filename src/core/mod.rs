pub mod ast;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use ast::{
    Declaration, DeclarationId, DeclarationKind, Literal, LiteralKind, LiteralTest, Parameter,
    ParameterShape, Receiver, SourceUnit, SyntaxKind, SyntaxNode,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Unknown,
}

impl Language {
    pub fn from_extension(ext: &str) -> Self {
        static EXTENSION_MAP: &[(&[&str], Language)] = &[
            (&["js", "jsx", "mjs", "cjs"], Language::JavaScript),
            (&["ts", "tsx", "mts", "cts"], Language::TypeScript),
        ];

        EXTENSION_MAP
            .iter()
            .find(|(exts, _)| exts.contains(&ext))
            .map(|(_, lang)| *lang)
            .unwrap_or(Language::Unknown)
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        static DISPLAY_STRINGS: &[(Language, &str)] = &[
            (Language::JavaScript, "JavaScript"),
            (Language::TypeScript, "TypeScript"),
            (Language::Unknown, "Unknown"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(lang, _)| lang == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// Identifier of one analyzed file, exactly as it appears in the report.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Paths are normalized to forward slashes so reports do not depend on the host.
    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().replace('\\', "/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        static DISPLAY_STRINGS: &[(Severity, &str)] = &[
            (Severity::Low, "low"),
            (Severity::Medium, "medium"),
            (Severity::High, "high"),
            (Severity::Critical, "critical"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(s, _)| s == self)
            .map(|(_, s)| *s)
            .unwrap_or("unknown");

        write!(f, "{display_str}")
    }
}

/// The refactoring a finding recommends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefactoringCategory {
    ExtractFunction,
    IntroduceValueObject,
    MoveMethod,
    ReplaceTypeCodeWithPolymorphism,
    ExtractParameterObject,
    ExtractClass,
    IntroduceGuardClauses,
}

impl RefactoringCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefactoringCategory::ExtractFunction => "extract-function",
            RefactoringCategory::IntroduceValueObject => "introduce-value-object",
            RefactoringCategory::MoveMethod => "move-method",
            RefactoringCategory::ReplaceTypeCodeWithPolymorphism => {
                "replace-type-code-with-polymorphism"
            }
            RefactoringCategory::ExtractParameterObject => "extract-parameter-object",
            RefactoringCategory::ExtractClass => "extract-class",
            RefactoringCategory::IntroduceGuardClauses => "introduce-guard-clauses",
        }
    }
}

impl fmt::Display for RefactoringCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of the rule (or engine condition) that produced a finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    LongMethod,
    PrimitiveObsession,
    FeatureEnvy,
    TypeCodeDispatch,
    DataClump,
    LongParameterList,
    DeepNesting,
    LargeClass,
    EngineFault,
    ParseFault,
    ReadFault,
    AnalysisTimeout,
}

impl RuleId {
    /// Smell rules in registry order.
    pub const SMELLS: [RuleId; 8] = [
        RuleId::LongMethod,
        RuleId::PrimitiveObsession,
        RuleId::FeatureEnvy,
        RuleId::TypeCodeDispatch,
        RuleId::DataClump,
        RuleId::LongParameterList,
        RuleId::DeepNesting,
        RuleId::LargeClass,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::LongMethod => "long-method",
            RuleId::PrimitiveObsession => "primitive-obsession",
            RuleId::FeatureEnvy => "feature-envy",
            RuleId::TypeCodeDispatch => "type-code-dispatch",
            RuleId::DataClump => "data-clump",
            RuleId::LongParameterList => "long-parameter-list",
            RuleId::DeepNesting => "deep-nesting",
            RuleId::LargeClass => "large-class",
            RuleId::EngineFault => "engine-fault",
            RuleId::ParseFault => "parse-fault",
            RuleId::ReadFault => "read-fault",
            RuleId::AnalysisTimeout => "analysis-timeout",
        }
    }

    pub fn is_smell(&self) -> bool {
        Self::SMELLS.contains(self)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SMELLS
            .iter()
            .find(|rule| rule.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown rule '{s}'"))
    }
}

/// Location of a declaration. Lines are 1-based; line 0 marks a file-level entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start_line: usize,
    pub end_line: usize,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl Span {
    pub fn new(start_line: usize, end_line: usize, start_byte: usize, end_byte: usize) -> Self {
        Self {
            start_line,
            end_line,
            start_byte,
            end_byte,
        }
    }

    pub fn at_line(line: usize) -> Self {
        Self::new(line, line, 0, 0)
    }
}

/// The declaration a finding is attached to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeclarationRef {
    /// `None` for file-level entries such as parse faults.
    pub id: Option<DeclarationId>,
    pub name: String,
    pub span: Span,
}

impl DeclarationRef {
    pub const FILE_LEVEL_NAME: &'static str = "<file>";

    pub fn of(declaration: &Declaration) -> Self {
        Self {
            id: Some(declaration.id),
            name: declaration.qualified_name.clone(),
            span: declaration.span,
        }
    }

    pub fn file_level(line: usize) -> Self {
        Self {
            id: None,
            name: Self::FILE_LEVEL_NAME.to_string(),
            span: Span::at_line(line),
        }
    }
}

/// Another declaration of the same unit that takes part in a finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RelatedSite {
    pub id: DeclarationId,
    pub name: String,
    pub start_line: usize,
}

/// One reported smell instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub file: FileId,
    pub rule: RuleId,
    pub severity: Severity,
    pub target: DeclarationRef,
    pub message: String,
    pub suggested_category: Option<RefactoringCategory>,
    pub related: Vec<RelatedSite>,
}

impl Finding {
    /// An entry for a file that could not be fully analyzed.
    pub fn file_level(file: FileId, rule: RuleId, line: usize, message: impl Into<String>) -> Self {
        Self {
            file,
            rule,
            severity: Severity::Critical,
            target: DeclarationRef::file_level(line),
            message: message.into(),
            suggested_category: None,
            related: Vec::new(),
        }
    }

    pub fn is_file_level(&self) -> bool {
        self.target.id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_path() {
        assert_eq!(
            Language::from_path(Path::new("src/order.js")),
            Language::JavaScript
        );
        assert_eq!(
            Language::from_path(Path::new("src/order.tsx")),
            Language::TypeScript
        );
        assert_eq!(Language::from_path(Path::new("README")), Language::Unknown);
        assert_eq!(
            Language::from_path(Path::new("lib.rs")),
            Language::Unknown
        );
    }

    #[test]
    fn test_rule_id_round_trips_through_its_name() {
        for rule in RuleId::SMELLS {
            assert_eq!(rule.as_str().parse::<RuleId>(), Ok(rule));
        }
        assert!("engine-fault".parse::<RuleId>().is_err());
        assert!("god-object".parse::<RuleId>().is_err());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_file_id_normalizes_separators() {
        let id = FileId::from_path(Path::new("src\\services\\order.js"));
        assert_eq!(id.as_str(), "src/services/order.js");
    }
}
