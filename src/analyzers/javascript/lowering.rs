//! Lowers tree-sitter statement and expression nodes into [`SyntaxNode`]s.

use super::{line_of, node_text};
use crate::core::{Literal, LiteralKind, LiteralTest, Receiver, SyntaxKind, SyntaxNode};
use std::collections::BTreeSet;
use tree_sitter::Node;

const FUNCTION_EXPRESSIONS: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
    "class",
    "method_definition",
];

const NESTED_DECLARATIONS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "class_declaration",
    "abstract_class_declaration",
];

/// Lowered body of one declaration.
pub(super) struct LoweredBody {
    pub statements: Vec<SyntaxNode>,
    pub locals: BTreeSet<String>,
}

pub(super) fn lower_body(body: Node, source: &str) -> LoweredBody {
    let mut lowerer = Lowerer {
        source,
        locals: BTreeSet::new(),
    };

    let statements = if body.kind() == "statement_block" {
        lowerer.lower_statements(body)
    } else {
        // Expression-bodied arrow function.
        vec![SyntaxNode::new(
            SyntaxKind::Statement,
            line_of(body),
            lowerer.lower_expression(body),
        )]
    };

    LoweredBody {
        statements,
        locals: lowerer.locals,
    }
}

struct Lowerer<'a> {
    source: &'a str,
    locals: BTreeSet<String>,
}

impl<'a> Lowerer<'a> {
    fn lower_statements(&mut self, block: Node) -> Vec<SyntaxNode> {
        let mut cursor = block.walk();
        let children: Vec<Node> = block.named_children(&mut cursor).collect();
        children
            .into_iter()
            .filter_map(|child| self.lower_statement(child))
            .collect()
    }

    fn lower_statement(&mut self, node: Node) -> Option<SyntaxNode> {
        let line = line_of(node);

        let lowered = match node.kind() {
            "comment" | "empty_statement" => return None,
            "statement_block" => SyntaxNode::new(SyntaxKind::Block, line, self.lower_statements(node)),
            "if_statement" => self.lower_if(node),
            "switch_statement" => self.lower_switch(node),
            "for_statement" | "for_in_statement" | "while_statement" | "do_statement" => {
                self.lower_loop(node)
            }
            "try_statement" => self.lower_try(node),
            "labeled_statement" => {
                return node
                    .child_by_field_name("body")
                    .and_then(|body| self.lower_statement(body));
            }
            kind if NESTED_DECLARATIONS.contains(&kind) => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.locals.insert(node_text(name, self.source).to_string());
                }
                SyntaxNode::leaf(SyntaxKind::NestedDeclaration, line)
            }
            "lexical_declaration" | "variable_declaration" => {
                let mut lowered = self.lower_declarators(node);
                // `const helper = () => {}` is a nested declaration, like `function helper() {}`.
                if declares_only_a_function(node) && lowered.len() == 1 {
                    return lowered.pop();
                }
                SyntaxNode::new(SyntaxKind::Statement, line, lowered)
            }
            _ => SyntaxNode::new(SyntaxKind::Statement, line, self.lower_children(node)),
        };

        Some(lowered)
    }

    fn lower_if(&mut self, node: Node) -> SyntaxNode {
        let condition = node.child_by_field_name("condition");
        let test = condition.and_then(|c| self.literal_test(c));

        let mut children = condition
            .map(|c| self.lower_expression(c))
            .unwrap_or_default();
        if let Some(consequence) = node.child_by_field_name("consequence") {
            children.extend(self.lower_statement(consequence));
        }
        if let Some(alternative) = node.child_by_field_name("alternative") {
            let mut cursor = alternative.walk();
            let inner: Vec<Node> = alternative.named_children(&mut cursor).collect();
            let branch: Vec<SyntaxNode> = inner
                .into_iter()
                .filter_map(|stmt| self.lower_statement(stmt))
                .collect();
            children.push(SyntaxNode::new(SyntaxKind::Else, line_of(alternative), branch));
        }

        SyntaxNode::new(SyntaxKind::If { test }, line_of(node), children)
    }

    fn lower_switch(&mut self, node: Node) -> SyntaxNode {
        let value = node.child_by_field_name("value");
        let subject = value.and_then(|v| self.subject_of(v));

        let mut children = value.map(|v| self.lower_expression(v)).unwrap_or_default();
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            let clauses: Vec<Node> = body.named_children(&mut cursor).collect();
            for clause in clauses {
                children.extend(self.lower_switch_clause(clause));
            }
        }

        SyntaxNode::new(SyntaxKind::Switch { subject }, line_of(node), children)
    }

    fn lower_switch_clause(&mut self, clause: Node) -> Option<SyntaxNode> {
        let kind = match clause.kind() {
            "switch_case" => {
                let test = clause
                    .child_by_field_name("value")
                    .and_then(|v| literal_of(unwrap_parens(v), self.source));
                SyntaxKind::Case { test }
            }
            "switch_default" => SyntaxKind::DefaultCase,
            _ => return None,
        };

        let mut children = clause
            .child_by_field_name("value")
            .map(|v| self.lower_expression(v))
            .unwrap_or_default();
        let mut cursor = clause.walk();
        let body: Vec<Node> = clause.children_by_field_name("body", &mut cursor).collect();
        children.extend(body.into_iter().filter_map(|stmt| self.lower_statement(stmt)));

        Some(SyntaxNode::new(kind, line_of(clause), children))
    }

    fn lower_loop(&mut self, node: Node) -> SyntaxNode {
        let body = node.child_by_field_name("body");
        let mut children = Vec::new();

        let mut cursor = node.walk();
        let parts: Vec<Node> = node.named_children(&mut cursor).collect();
        for part in parts {
            if Some(part) == body {
                continue;
            }
            match part.kind() {
                "lexical_declaration" | "variable_declaration" => {
                    children.extend(self.lower_declarators(part));
                }
                "identifier" if node.kind() == "for_in_statement" => {
                    // `for (item of items)` reuses an outer binding; nothing to lower.
                }
                _ => children.extend(self.lower_expression(part)),
            }
        }
        if node.kind() == "for_in_statement" {
            if let Some(left) = node.child_by_field_name("left") {
                self.bind_pattern(left);
            }
        }
        if let Some(body) = body {
            children.extend(self.lower_statement(body));
        }

        SyntaxNode::new(SyntaxKind::Loop, line_of(node), children)
    }

    fn lower_try(&mut self, node: Node) -> SyntaxNode {
        let mut children = Vec::new();

        if let Some(body) = node.child_by_field_name("body") {
            children.extend(self.lower_statement(body));
        }
        if let Some(handler) = node.child_by_field_name("handler") {
            if let Some(param) = handler.child_by_field_name("parameter") {
                self.bind_pattern(param);
            }
            let block = handler
                .child_by_field_name("body")
                .and_then(|body| self.lower_statement(body));
            children.push(SyntaxNode::new(
                SyntaxKind::Catch,
                line_of(handler),
                block.into_iter().collect(),
            ));
        }
        if let Some(finalizer) = node.child_by_field_name("finalizer") {
            let block = finalizer
                .child_by_field_name("body")
                .and_then(|body| self.lower_statement(body));
            children.push(SyntaxNode::new(
                SyntaxKind::Finally,
                line_of(finalizer),
                block.into_iter().collect(),
            ));
        }

        SyntaxNode::new(SyntaxKind::Try, line_of(node), children)
    }

    fn lower_declarators(&mut self, declaration: Node) -> Vec<SyntaxNode> {
        let mut lowered = Vec::new();
        let mut cursor = declaration.walk();
        let declarators: Vec<Node> = declaration.named_children(&mut cursor).collect();

        for declarator in declarators {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            if let Some(name) = declarator.child_by_field_name("name") {
                self.bind_pattern(name);
            }
            if let Some(value) = declarator.child_by_field_name("value") {
                lowered.extend(self.lower_expression(value));
            }
        }

        lowered
    }

    /// Lowers an expression into the interesting nodes it contains.
    fn lower_expression(&mut self, node: Node) -> Vec<SyntaxNode> {
        let line = line_of(node);
        let kind = node.kind();

        if kind == "arrow_function" {
            return vec![SyntaxNode::new(
                SyntaxKind::NestedDeclaration,
                line,
                self.shared_this_accesses(node),
            )];
        }
        if FUNCTION_EXPRESSIONS.contains(&kind) {
            return vec![SyntaxNode::leaf(SyntaxKind::NestedDeclaration, line)];
        }

        match kind {
            "comment" | "identifier" | "this" | "super" | "property_identifier"
            | "shorthand_property_identifier" => Vec::new(),
            "ternary_expression" => vec![SyntaxNode::new(
                SyntaxKind::Ternary,
                line,
                self.lower_children(node),
            )],
            "binary_expression" => {
                let children = self.lower_children(node);
                if is_short_circuit(node) {
                    vec![SyntaxNode::new(SyntaxKind::ShortCircuit, line, children)]
                } else {
                    children
                }
            }
            "member_expression" | "subscript_expression" => self.lower_member_chain(node),
            "string" | "template_string" | "number" | "true" | "false" | "null" | "undefined"
            | "regex" => {
                let mut lowered = Vec::new();
                if let Some(literal) = literal_of(node, self.source) {
                    lowered.push(SyntaxNode::leaf(SyntaxKind::Literal(literal), line));
                }
                if kind == "template_string" {
                    lowered.extend(self.lower_children(node));
                }
                lowered
            }
            _ => self.lower_children(node),
        }
    }

    /// An arrow function shares `this` with its enclosing declaration, so its
    /// `this` accesses are kept as children of the opaque nested node.
    fn shared_this_accesses(&self, arrow: Node) -> Vec<SyntaxNode> {
        let Some(body) = arrow.child_by_field_name("body") else {
            return Vec::new();
        };

        let mut accesses = Vec::new();
        for node in lower_body(body, self.source).statements {
            node.walk(&mut |n| {
                if matches!(n.kind, SyntaxKind::MemberAccess { receiver: Receiver::This }) {
                    accesses.push(SyntaxNode::leaf(n.kind.clone(), n.line));
                }
            });
        }
        accesses
    }

    fn lower_children(&mut self, node: Node) -> Vec<SyntaxNode> {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        children
            .into_iter()
            .flat_map(|child| self.lower_expression(child))
            .collect()
    }

    /// `a.b[c].d()` is one access rooted at `a`; index expressions and a
    /// computed root are lowered separately.
    fn lower_member_chain(&mut self, node: Node) -> Vec<SyntaxNode> {
        let mut lowered = Vec::new();
        let mut root = node;

        while matches!(root.kind(), "member_expression" | "subscript_expression") {
            if let Some(index) = root.child_by_field_name("index") {
                lowered.extend(self.lower_expression(index));
            }
            match root.child_by_field_name("object") {
                Some(object) => root = unwrap_parens(object),
                None => break,
            }
        }

        let receiver = match root.kind() {
            "this" | "super" => Receiver::This,
            "identifier" => Receiver::Named(node_text(root, self.source).to_string()),
            _ => {
                lowered.extend(self.lower_expression(root));
                Receiver::Computed
            }
        };

        lowered.insert(
            0,
            SyntaxNode::leaf(SyntaxKind::MemberAccess { receiver }, line_of(node)),
        );
        lowered
    }

    fn literal_test(&self, condition: Node) -> Option<LiteralTest> {
        let condition = unwrap_parens(condition);
        if condition.kind() != "binary_expression" {
            return None;
        }
        let operator = condition.child_by_field_name("operator")?.kind();
        if operator != "===" && operator != "==" {
            return None;
        }

        let left = unwrap_parens(condition.child_by_field_name("left")?);
        let right = unwrap_parens(condition.child_by_field_name("right")?);

        let (subject, literal) = match (literal_of(left, self.source), literal_of(right, self.source)) {
            (None, Some(literal)) => (self.subject_of(left)?, literal),
            (Some(literal), None) => (self.subject_of(right)?, literal),
            _ => return None,
        };

        Some(LiteralTest { subject, literal })
    }

    /// A discriminant that names a single variable: `kind`, `payment.type`.
    fn subject_of(&self, node: Node) -> Option<String> {
        let node = unwrap_parens(node);
        match node.kind() {
            "identifier" | "member_expression" => Some(
                node_text(node, self.source)
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect(),
            ),
            _ => None,
        }
    }

    fn bind_pattern(&mut self, pattern: Node) {
        match pattern.kind() {
            "identifier" | "shorthand_property_identifier_pattern" => {
                self.locals
                    .insert(node_text(pattern, self.source).to_string());
            }
            "assignment_pattern" => {
                if let Some(left) = pattern.child_by_field_name("left") {
                    self.bind_pattern(left);
                }
            }
            "pair_pattern" => {
                if let Some(value) = pattern.child_by_field_name("value") {
                    self.bind_pattern(value);
                }
            }
            _ => {
                let mut cursor = pattern.walk();
                let children: Vec<Node> = pattern.named_children(&mut cursor).collect();
                for child in children {
                    self.bind_pattern(child);
                }
            }
        }
    }
}

fn declares_only_a_function(declaration: Node) -> bool {
    let mut cursor = declaration.walk();
    let declarators: Vec<Node> = declaration
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "variable_declarator")
        .collect();

    declarators.len() == 1
        && declarators[0]
            .child_by_field_name("value")
            .map(|value| FUNCTION_EXPRESSIONS.contains(&unwrap_parens(value).kind()))
            .unwrap_or(false)
}

fn is_short_circuit(node: Node) -> bool {
    node.child_by_field_name("operator")
        .map(|op| matches!(op.kind(), "&&" | "||" | "??"))
        .unwrap_or(false)
}

pub(super) fn unwrap_parens(mut node: Node) -> Node {
    while node.kind() == "parenthesized_expression" {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

fn literal_of(node: Node, source: &str) -> Option<Literal> {
    let kind = match node.kind() {
        "string" => LiteralKind::String,
        // Only substitution-free templates are constants.
        "template_string" => {
            let mut cursor = node.walk();
            let has_substitution = node
                .named_children(&mut cursor)
                .any(|child| child.kind() == "template_substitution");
            if has_substitution {
                return None;
            }
            LiteralKind::Template
        }
        "number" => LiteralKind::Number,
        "true" | "false" => LiteralKind::Boolean,
        "null" => LiteralKind::Null,
        "undefined" => LiteralKind::Undefined,
        "regex" => LiteralKind::Regex,
        _ => return None,
    };

    Some(Literal {
        kind,
        text: node_text(node, source).to_string(),
    })
}
