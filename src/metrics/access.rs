use crate::core::{Declaration, Receiver, SyntaxKind};
use std::collections::BTreeMap;

/// Globals whose members say nothing about which object a method envies.
const BUILTIN_RECEIVERS: &[&str] = &[
    "console", "Math", "JSON", "Object", "Array", "Number", "String", "Boolean", "Promise",
    "Date", "Symbol", "Reflect", "Intl", "Error",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessCounts {
    pub own: usize,
    pub external: usize,
}

enum Origin<'a> {
    Own,
    External(&'a str),
    Ignored,
}

impl AccessCounts {
    pub fn of(declaration: &Declaration) -> Self {
        let mut counts = AccessCounts::default();
        visit_accesses(declaration, |origin| match origin {
            Origin::Own => counts.own += 1,
            Origin::External(_) => counts.external += 1,
            Origin::Ignored => {}
        });
        counts
    }
}

/// External access counts per receiver name, e.g. `{"order": 6}`.
pub fn external_receivers(declaration: &Declaration) -> BTreeMap<String, usize> {
    let mut receivers = BTreeMap::new();
    visit_accesses(declaration, |origin| {
        if let Origin::External(name) = origin {
            *receivers.entry(name.to_string()).or_insert(0) += 1;
        }
    });
    receivers
}

fn visit_accesses<'a>(declaration: &'a Declaration, mut record: impl FnMut(Origin<'a>)) {
    for node in &declaration.body {
        node.walk(&mut |n| {
            if let SyntaxKind::MemberAccess { receiver } = &n.kind {
                record(classify(declaration, receiver));
            }
        });
    }
}

fn classify<'a>(declaration: &Declaration, receiver: &'a Receiver) -> Origin<'a> {
    match receiver {
        Receiver::This => Origin::Own,
        Receiver::Named(name) if declaration.is_parameter(name) => Origin::External(name),
        Receiver::Named(name)
            if declaration.locals.contains(name) || BUILTIN_RECEIVERS.contains(&name.as_str()) =>
        {
            Origin::Ignored
        }
        Receiver::Named(name) => Origin::External(name),
        Receiver::Computed => Origin::Ignored,
    }
}
