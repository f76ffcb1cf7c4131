mod declarations;
mod lowering;

use crate::analyzers::SyntaxFacade;
use crate::core::{FileId, Language, SourceUnit};
use crate::errors::ParseFault;
use tree_sitter::{Node, Parser};

/// Deepest syntax nesting the declaration collector and lowerer will walk.
/// Both recurse per node, so deeper trees become parse faults.
pub const MAX_SYNTAX_DEPTH: usize = 256;

/// Tree-sitter backed facade for JavaScript and TypeScript sources.
pub struct JavaScriptFacade {
    language: Language,
}

impl JavaScriptFacade {
    pub fn new_javascript() -> Self {
        Self {
            language: Language::JavaScript,
        }
    }

    pub fn new_typescript() -> Self {
        Self {
            language: Language::TypeScript,
        }
    }

    fn grammar_for(&self, file: &FileId) -> tree_sitter::Language {
        match self.language {
            Language::TypeScript if file.as_str().ends_with(".tsx") => {
                tree_sitter_typescript::LANGUAGE_TSX.into()
            }
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            _ => tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

impl SyntaxFacade for JavaScriptFacade {
    fn parse(&self, source: &str, file: FileId) -> Result<SourceUnit, ParseFault> {
        // Parsers are not shareable across threads; one per file is cheap enough.
        let mut parser = Parser::new();
        parser
            .set_language(&self.grammar_for(&file))
            .map_err(|e| {
                ParseFault::unpositioned(file.clone(), format!("failed to load grammar: {e}"))
            })?;

        let tree = parser.parse(source, None).ok_or_else(|| {
            ParseFault::unpositioned(file.clone(), "parser returned no syntax tree")
        })?;

        let root = tree.root_node();
        if let Some(node) = first_node_deeper_than(root, MAX_SYNTAX_DEPTH) {
            let position = node.start_position();
            return Err(ParseFault::new(
                file,
                position.row + 1,
                position.column + 1,
                format!("syntax nested deeper than {MAX_SYNTAX_DEPTH} levels"),
            ));
        }
        if root.has_error() {
            return Err(syntax_error(root, source, file));
        }

        Ok(SourceUnit {
            declarations: declarations::collect(root, source),
            file,
            language: self.language,
        })
    }

    fn language(&self) -> Language {
        self.language
    }
}

fn syntax_error(root: Node, source: &str, file: FileId) -> ParseFault {
    match first_error_node(root) {
        Some(node) => {
            let position = node.start_position();
            let message = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                let snippet: String = node_text(node, source).chars().take(20).collect();
                format!("unexpected `{}`", snippet.trim())
            };
            ParseFault::new(file, position.row + 1, position.column + 1, message)
        }
        None => ParseFault::new(file, 1, 1, "syntax error"),
    }
}

/// Cursor walk, so arbitrarily deep trees are measured without recursion.
fn first_node_deeper_than(root: Node, limit: usize) -> Option<Node> {
    let mut cursor = root.walk();
    let mut depth = 0;
    loop {
        if cursor.goto_first_child() {
            depth += 1;
            if depth > limit {
                return Some(cursor.node());
            }
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
            depth -= 1;
        }
    }
}

fn first_error_node(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_node)
}

pub(crate) fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

pub(crate) fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}
