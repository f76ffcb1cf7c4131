//! Collects function, method and class declarations in source order.

use super::lowering::{lower_body, unwrap_parens};
use super::{line_of, node_text};
use crate::core::{Declaration, DeclarationId, DeclarationKind, Parameter, ParameterShape, Span};
use std::collections::BTreeSet;
use tree_sitter::Node;

const FUNCTION_VALUES: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

#[derive(Clone, Copy)]
struct Scope {
    parent: Option<DeclarationId>,
    depth: u32,
}

impl Scope {
    const TOP: Scope = Scope {
        parent: None,
        depth: 0,
    };

    fn enter(self, id: DeclarationId) -> Scope {
        Scope {
            parent: Some(id),
            depth: self.depth + 1,
        }
    }
}

pub(super) fn collect(root: Node, source: &str) -> Vec<Declaration> {
    let mut collector = Collector {
        source,
        declarations: Vec::new(),
    };
    collector.visit(root, Scope::TOP);
    collector.declarations
}

struct Collector<'a> {
    source: &'a str,
    declarations: Vec<Declaration>,
}

impl<'a> Collector<'a> {
    fn visit(&mut self, node: Node, scope: Scope) {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                let name = self.name_of(node, "<anonymous>");
                self.register_function(node, name, DeclarationKind::Function, scope);
            }
            "class_declaration" | "abstract_class_declaration" | "class" => {
                let name = self.name_of(node, "<anonymous>");
                self.register_class(node, name, scope);
            }
            "method_definition" if is_class_member(node) => {
                let name = self.name_of(node, "<anonymous>");
                self.register_function(node, name, DeclarationKind::Method, scope);
            }
            "method_definition" => {
                let name = self.name_of(node, "<anonymous>");
                let qualified_name = self.member_of_object(node, &name);
                self.register_named(node, name, qualified_name, DeclarationKind::Method, scope);
            }
            "pair" => self.visit_pair(node, scope),
            "field_definition" | "public_field_definition" => self.visit_field(node, scope),
            "assignment_expression" => self.visit_assignment(node, scope),
            "variable_declarator" => self.visit_declarator(node, scope),
            // Callbacks and other unbound function values.
            kind if FUNCTION_VALUES.contains(&kind) => {
                let name = self.name_of(node, &format!("<anonymous>@{}", line_of(node)));
                self.register_function(node, name, DeclarationKind::Function, scope);
            }
            _ => self.visit_children(node, scope),
        }
    }

    fn visit_children(&mut self, node: Node, scope: Scope) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            self.visit(child, scope);
        }
    }

    /// `const format = (value) => ...` declares a function named `format`.
    fn visit_declarator(&mut self, node: Node, scope: Scope) {
        let value = node.child_by_field_name("value").map(unwrap_parens);
        let name = node
            .child_by_field_name("name")
            .filter(|name| name.kind() == "identifier")
            .map(|name| node_text(name, self.source).to_string());

        match (name, value) {
            (Some(name), Some(value)) if FUNCTION_VALUES.contains(&value.kind()) => {
                self.register_function(value, name, DeclarationKind::Function, scope);
            }
            (Some(name), Some(value)) if value.kind() == "class" => {
                self.register_class(value, name, scope);
            }
            _ => self.visit_children(node, scope),
        }
    }

    /// `{ ship: function (...) {...} }`; arrow values keep the enclosing `this`
    /// and are plain functions.
    fn visit_pair(&mut self, node: Node, scope: Scope) {
        let key = node.child_by_field_name("key");
        let value = node.child_by_field_name("value").map(unwrap_parens);

        match (key, value) {
            (Some(key), Some(value)) if FUNCTION_VALUES.contains(&value.kind()) => {
                let name = node_text(key, self.source).to_string();
                let qualified_name = self.member_of_object(node, &name);
                let kind = if value.kind() == "arrow_function" {
                    DeclarationKind::Function
                } else {
                    DeclarationKind::Method
                };
                self.register_named(value, name, qualified_name, kind, scope);
            }
            _ => self.visit_children(node, scope),
        }
    }

    /// `onSubmit = (event) => {...}` inside a class body.
    fn visit_field(&mut self, node: Node, scope: Scope) {
        let key = node
            .child_by_field_name("property")
            .or_else(|| node.child_by_field_name("name"));
        let value = node.child_by_field_name("value").map(unwrap_parens);

        match (key, value) {
            (Some(key), Some(value)) if FUNCTION_VALUES.contains(&value.kind()) => {
                let name = node_text(key, self.source).to_string();
                self.register_function(value, name, DeclarationKind::Method, scope);
            }
            _ => self.visit_children(node, scope),
        }
    }

    /// `module.exports.ship = function (...) {...}` is named after its target.
    fn visit_assignment(&mut self, node: Node, scope: Scope) {
        let target = node
            .child_by_field_name("left")
            .map(|left| compact(node_text(left, self.source)));
        let value = node.child_by_field_name("right").map(unwrap_parens);

        match (target, value) {
            (Some(name), Some(value)) if FUNCTION_VALUES.contains(&value.kind()) => {
                self.register_function(value, name, DeclarationKind::Function, scope);
            }
            (Some(name), Some(value)) if value.kind() == "class" => {
                self.register_class(value, name, scope);
            }
            _ => self.visit_children(node, scope),
        }
    }

    /// `svc.createOrder` when the object literal is bound to a name.
    fn member_of_object(&self, member: Node, name: &str) -> String {
        let owner = member
            .parent()
            .filter(|object| object.kind() == "object")
            .and_then(|object| object.parent())
            .and_then(|holder| {
                let binding = match holder.kind() {
                    "variable_declarator" => holder.child_by_field_name("name"),
                    "assignment_expression" => holder.child_by_field_name("left"),
                    "pair" => holder.child_by_field_name("key"),
                    _ => None,
                }?;
                Some(compact(node_text(binding, self.source)))
            });

        match owner {
            Some(owner) => format!("{owner}.{name}"),
            None => name.to_string(),
        }
    }

    fn register_function(&mut self, node: Node, name: String, kind: DeclarationKind, scope: Scope) {
        let qualified_name = self.qualify(&name, kind, scope);
        self.register_named(node, name, qualified_name, kind, scope);
    }

    fn register_named(
        &mut self,
        node: Node,
        name: String,
        qualified_name: String,
        kind: DeclarationKind,
        scope: Scope,
    ) {
        let id = DeclarationId(self.declarations.len());

        let lowered = node.child_by_field_name("body").map(|body| lower_body(body, self.source));
        let (body, locals) = match lowered {
            Some(lowered) => (lowered.statements, lowered.locals),
            None => (Vec::new(), BTreeSet::new()),
        };

        self.declarations.push(Declaration {
            id,
            name,
            qualified_name,
            kind,
            parent: scope.parent,
            parameters: self.parameters_of(node),
            body,
            locals,
            lexical_depth: scope.depth,
            span: span_of(node),
        });

        match node.child_by_field_name("body") {
            Some(body) if body.kind() == "statement_block" => {
                self.visit_children(body, scope.enter(id));
            }
            // `a => b => a + b`
            Some(body) => self.visit(body, scope.enter(id)),
            None => {}
        }
    }

    fn register_class(&mut self, node: Node, name: String, scope: Scope) {
        let id = DeclarationId(self.declarations.len());
        let qualified_name = self.qualify(&name, DeclarationKind::Class, scope);

        self.declarations.push(Declaration {
            id,
            name,
            qualified_name,
            kind: DeclarationKind::Class,
            parent: scope.parent,
            parameters: Vec::new(),
            body: Vec::new(),
            locals: BTreeSet::new(),
            lexical_depth: scope.depth,
            span: span_of(node),
        });

        if let Some(body) = node.child_by_field_name("body") {
            self.visit_children(body, scope.enter(id));
        }
    }

    fn qualify(&self, name: &str, kind: DeclarationKind, scope: Scope) -> String {
        let class = scope
            .parent
            .and_then(|id| self.declarations.get(id.0))
            .filter(|parent| parent.kind == DeclarationKind::Class);

        match class {
            Some(class) if kind == DeclarationKind::Method => format!("{}.{}", class.name, name),
            _ => name.to_string(),
        }
    }

    fn name_of(&self, node: Node, fallback: &str) -> String {
        node.child_by_field_name("name")
            .map(|name| node_text(name, self.source).to_string())
            .unwrap_or_else(|| fallback.to_string())
    }

    fn parameters_of(&self, node: Node) -> Vec<Parameter> {
        if let Some(single) = node.child_by_field_name("parameter") {
            // `x => ...` without parentheses.
            return self.parameter(single, 0).into_iter().collect();
        }

        let Some(list) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };

        let mut cursor = list.walk();
        let nodes: Vec<Node> = list
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect();

        let mut parameters = Vec::new();
        for child in nodes {
            if let Some(param) = self.parameter(child, parameters.len()) {
                parameters.push(param);
            }
        }
        parameters
    }

    fn parameter(&self, node: Node, position: usize) -> Option<Parameter> {
        match node.kind() {
            "identifier" => Some(Parameter::simple(node_text(node, self.source), position)),
            "assignment_pattern" => {
                let left = node.child_by_field_name("left")?;
                self.parameter(left, position)
            }
            "rest_pattern" => {
                let inner = node.named_child(0)?;
                let mut param = self.parameter(inner, position)?;
                param.shape = ParameterShape::Rest;
                Some(param)
            }
            "object_pattern" | "array_pattern" => Some(Parameter {
                name: node_text(node, self.source).to_string(),
                position,
                type_annotation: None,
                shape: ParameterShape::Destructured,
            }),
            "required_parameter" | "optional_parameter" => {
                let pattern = node.child_by_field_name("pattern")?;
                if pattern.kind() == "this" {
                    return None;
                }
                let mut param = self.parameter(pattern, position)?;
                if let Some(annotation) = node.child_by_field_name("type") {
                    let text = node_text(annotation, self.source);
                    param.type_annotation = Some(text.trim_start_matches(':').trim().to_string());
                }
                Some(param)
            }
            _ => None,
        }
    }
}

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_class_member(node: Node) -> bool {
    node.parent()
        .map(|parent| parent.kind() == "class_body")
        .unwrap_or(false)
}

fn span_of(node: Node) -> Span {
    Span::new(
        line_of(node),
        node.end_position().row + 1,
        node.start_byte(),
        node.end_byte(),
    )
}
