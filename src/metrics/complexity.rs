use crate::core::{SyntaxKind, SyntaxNode};

/// 1 + decision points: `if`, non-default `case`, short-circuit operators,
/// loops and ternaries.
pub(super) fn cyclomatic_complexity(body: &[SyntaxNode]) -> u32 {
    1 + count_nodes(body, is_decision_point) as u32
}

fn is_decision_point(kind: &SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::If { .. }
            | SyntaxKind::Case { .. }
            | SyntaxKind::ShortCircuit
            | SyntaxKind::Loop
            | SyntaxKind::Ternary
    )
}

pub(super) fn statement_count(body: &[SyntaxNode]) -> usize {
    count_nodes(body, SyntaxKind::is_statement)
}

pub(super) fn literal_count(body: &[SyntaxNode]) -> usize {
    count_nodes(body, |kind| matches!(kind, SyntaxKind::Literal(_)))
}

fn count_nodes(body: &[SyntaxNode], predicate: impl Fn(&SyntaxKind) -> bool) -> usize {
    let mut count = 0;
    for node in body {
        node.walk(&mut |n| {
            if predicate(&n.kind) {
                count += 1;
            }
        });
    }
    count
}

/// Deepest if / switch / loop nesting; `else if` stays at its chain's depth.
pub(super) fn nesting_depth(body: &[SyntaxNode]) -> u32 {
    body.iter().map(|node| max_nesting(node, 0)).max().unwrap_or(0)
}

fn max_nesting(node: &SyntaxNode, depth: u32) -> u32 {
    match &node.kind {
        SyntaxKind::If { .. } => {
            let inner = depth + 1;
            node.children
                .iter()
                .map(|child| match child.kind {
                    SyntaxKind::Else => else_nesting(child, depth),
                    _ => max_nesting(child, inner),
                })
                .fold(inner, u32::max)
        }
        SyntaxKind::Switch { .. } | SyntaxKind::Loop => {
            let inner = depth + 1;
            node.children
                .iter()
                .map(|child| max_nesting(child, inner))
                .fold(inner, u32::max)
        }
        _ => node
            .children
            .iter()
            .map(|child| max_nesting(child, depth))
            .fold(depth, u32::max),
    }
}

fn else_nesting(branch: &SyntaxNode, depth: u32) -> u32 {
    branch
        .children
        .iter()
        .map(|child| match child.kind {
            SyntaxKind::If { .. } => max_nesting(child, depth),
            _ => max_nesting(child, depth + 1),
        })
        .fold(depth, u32::max)
}
