//! Property-based tests for the analysis pipeline
//!
//! Invariants checked for generated inputs:
//! - Every function or method has cyclomatic complexity of at least 1
//! - Analyzing the same input twice yields byte-equal reports
//! - Input order does not change the aggregated report
//! - Raising the statement threshold above a function's size removes only
//!   its long-method finding

mod common;

use common::*;
use proptest::prelude::*;
use smellmap::analyzers::parse_source;
use smellmap::config::SmellmapConfig;
use smellmap::core::{FileId, Language, RuleId};
use smellmap::metrics::extract_unit_metrics;
use smellmap::pipeline::SourceInput;

const FRAGMENTS: &[&str] = &[
    "if (a) { b(); }",
    "if (kind === \"x\") { x(); } else if (kind === \"y\") { y(); } else { z(); }",
    "for (const item of items) { total += item.price; }",
    "while (i < 10) { i++; }",
    "let flag = ready && loaded || fallback;",
    "const label = count > 1 ? \"many\" : \"one\";",
    "switch (mode) { case 1: run(); break; default: stop(); }",
    "try { risky(); } catch (e) { log(e); }",
    "this.value = input.value;",
    "const helper = () => { return 1; };",
];

fn statement() -> impl Strategy<Value = String> {
    prop::sample::select(FRAGMENTS).prop_map(str::to_string)
}

fn function_source() -> impl Strategy<Value = String> {
    (
        "[a-z][a-zA-Z]{0,8}",
        prop::collection::vec("[a-z]{1,6}", 0..7),
        prop::collection::vec(statement(), 0..12),
    )
        .prop_map(|(name, params, body)| {
            format!(
                "function fn_{}({}) {{\n{}\n}}\n",
                name,
                dedup(params).join(", "),
                body.join("\n")
            )
        })
}

/// Duplicate parameter names are a syntax error in strict contexts.
fn dedup(mut params: Vec<String>) -> Vec<String> {
    params.sort();
    params.dedup();
    params
        .into_iter()
        .map(|p| format!("p_{p}"))
        .collect()
}

fn program() -> impl Strategy<Value = String> {
    prop::collection::vec(function_source(), 1..5).prop_map(|fns| fns.concat())
}

fn fixture_inputs() -> Vec<SourceInput> {
    vec![
        js("order.js", ORDER_SOURCE),
        js("payment.js", PAYMENT_SOURCE),
        js("invoice.js", INVOICE_SOURCE),
        js("long.js", &straight_line_function("setup", 40)),
        js("broken.js", "class {"),
    ]
}

proptest! {
    #[test]
    fn prop_cyclomatic_complexity_is_at_least_one(source in program()) {
        let unit = parse_source(&source, FileId::new("gen.js"), Language::JavaScript)
            .expect("generated source should parse");
        let metrics = extract_unit_metrics(&unit);

        for (_, m) in metrics.iter() {
            prop_assert!(m.cyclomatic_complexity >= 1);
        }
    }

    #[test]
    fn prop_analysis_is_idempotent(source in program()) {
        let inputs = [js("gen.js", &source)];
        let first = analyze(&inputs).to_json().unwrap();
        let second = analyze(&inputs).to_json().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_input_order_does_not_change_report(
        shuffled in Just(fixture_inputs()).prop_shuffle()
    ) {
        let expected = analyze(&fixture_inputs()).to_json().unwrap();
        let actual = analyze(&shuffled).to_json().unwrap();
        prop_assert_eq!(expected, actual);
    }

    #[test]
    fn prop_statement_threshold_is_monotonic(
        statements in 1usize..60,
        threshold in 1usize..80,
    ) {
        let source = format!(
            "{}{}",
            straight_line_function("target", statements),
            ORDER_SOURCE
        );
        let inputs = [js("mono.js", &source)];

        let mut config = SmellmapConfig::default();
        config.thresholds.long_method_statements = threshold;
        let report = engine_with(config).analyze_batch(&inputs);

        let long_method = entries_of(&report, RuleId::LongMethod);
        prop_assert_eq!(!long_method.is_empty(), statements > threshold);

        let mut raised = SmellmapConfig::default();
        raised.thresholds.long_method_statements = statements;
        let relaxed = engine_with(raised).analyze_batch(&inputs);

        let others = |r: &smellmap::report::Report| -> Vec<_> {
            r.entries()
                .iter()
                .filter(|e| e.rule_id != RuleId::LongMethod)
                .cloned()
                .collect()
        };
        prop_assert!(entries_of(&relaxed, RuleId::LongMethod).is_empty());
        prop_assert_eq!(others(&report), others(&relaxed));
    }
}
