//! Language-agnostic view of one parsed source file.
//!
//! A facade lowers the external parse tree into these owned types once per
//! file. Rules and metrics only ever see this view, never the parser's nodes.

use super::{FileId, Language, Span};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One analyzed file.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    pub file: FileId,
    pub language: Language,
    pub declarations: Vec<Declaration>,
}

impl SourceUnit {
    pub fn declaration(&self, id: DeclarationId) -> Option<&Declaration> {
        self.declarations.get(id.0).filter(|decl| decl.id == id)
    }

    /// Declarations directly nested in `parent` (methods of a class, inner functions).
    pub fn children_of(&self, parent: DeclarationId) -> impl Iterator<Item = &Declaration> {
        self.declarations
            .iter()
            .filter(move |decl| decl.parent == Some(parent))
    }

    pub fn functions(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations
            .iter()
            .filter(|decl| decl.kind != DeclarationKind::Class)
    }
}

/// Index of a declaration within its [`SourceUnit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclarationId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Function,
    Method,
    Class,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationKind::Function => write!(f, "Function"),
            DeclarationKind::Method => write!(f, "Method"),
            DeclarationKind::Class => write!(f, "Class"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Declaration {
    pub id: DeclarationId,
    pub name: String,
    /// `Class.method` for methods, otherwise the plain name.
    pub qualified_name: String,
    pub kind: DeclarationKind,
    pub parent: Option<DeclarationId>,
    pub parameters: Vec<Parameter>,
    /// Lowered body statements. Empty for classes; methods are separate declarations.
    pub body: Vec<SyntaxNode>,
    /// Names bound inside the body (variables, catch parameters, inner functions).
    pub locals: BTreeSet<String>,
    /// Number of enclosing declarations.
    pub lexical_depth: u32,
    pub span: Span,
}

impl Declaration {
    pub fn is_method(&self) -> bool {
        self.kind == DeclarationKind::Method
    }

    pub fn is_parameter(&self, name: &str) -> bool {
        self.parameters.iter().any(|param| param.name == name)
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|param| param.name.as_str()).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParameterShape {
    Simple,
    Destructured,
    Rest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub position: usize,
    /// Annotation text without the leading colon, when the language has one.
    pub type_annotation: Option<String>,
    pub shape: ParameterShape,
}

impl Parameter {
    pub fn simple(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
            type_annotation: None,
            shape: ParameterShape::Simple,
        }
    }

    pub fn with_type(mut self, annotation: impl Into<String>) -> Self {
        self.type_annotation = Some(annotation.into());
        self
    }

    /// True when nothing says this parameter carries structured data.
    pub fn is_primitive_typed(&self) -> bool {
        if self.shape == ParameterShape::Destructured {
            return false;
        }

        match &self.type_annotation {
            None => true,
            Some(annotation) => annotation
                .split('|')
                .map(str::trim)
                .all(is_primitive_annotation),
        }
    }
}

fn is_primitive_annotation(annotation: &str) -> bool {
    const PRIMITIVES: &[&str] = &[
        "string", "number", "boolean", "bigint", "symbol", "null", "undefined", "String",
        "Number", "Boolean",
    ];

    PRIMITIVES.contains(&annotation)
        || annotation.starts_with('\'')
        || annotation.starts_with('"')
        || annotation.parse::<f64>().is_ok()
}

/// A node of a lowered declaration body.
///
/// Only constructs that matter to metrics and rules get their own kind;
/// everything else is flattened into the enclosing statement.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub line: usize,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn leaf(kind: SyntaxKind, line: usize) -> Self {
        Self {
            kind,
            line,
            children: Vec::new(),
        }
    }

    pub fn new(kind: SyntaxKind, line: usize, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind,
            line,
            children,
        }
    }

    /// Pre-order traversal of this node and its descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SyntaxNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SyntaxKind {
    Block,
    /// Any statement without a more specific kind.
    Statement,
    /// `test` is set when the condition compares one subject against a literal.
    If {
        test: Option<LiteralTest>,
    },
    Else,
    Switch {
        subject: Option<String>,
    },
    Case {
        test: Option<Literal>,
    },
    DefaultCase,
    Loop,
    Try,
    Catch,
    Finally,
    Ternary,
    /// `&&`, `||` or `??`.
    ShortCircuit,
    /// One member-access chain; `a.b.c()` is a single access rooted at `a`.
    MemberAccess {
        receiver: Receiver,
    },
    Literal(Literal),
    /// A function or class defined inside the body. Its contents are opaque,
    /// except the `this` accesses of an arrow function, kept as children.
    NestedDeclaration,
}

impl SyntaxKind {
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            SyntaxKind::Statement
                | SyntaxKind::If { .. }
                | SyntaxKind::Switch { .. }
                | SyntaxKind::Loop
                | SyntaxKind::Try
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Receiver {
    /// `this` or `super`.
    This,
    Named(String),
    /// Call results, literals and other computed receivers.
    Computed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    String,
    Template,
    Number,
    Boolean,
    Null,
    Undefined,
    Regex,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
}

/// `subject === literal` (or `==`, either operand order).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteralTest {
    pub subject: String,
    pub literal: Literal,
}
