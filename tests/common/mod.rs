// Shared helpers for smellmap integration tests
#![allow(dead_code)]

use smellmap::config::{SmellmapConfig, ValidatedConfig};
use smellmap::core::{Language, RuleId};
use smellmap::pipeline::{Engine, SourceInput};
use smellmap::report::{Report, ReportEntry};

pub fn js(file: &str, text: &str) -> SourceInput {
    SourceInput::memory(file, Language::JavaScript, text)
}

pub fn ts(file: &str, text: &str) -> SourceInput {
    SourceInput::memory(file, Language::TypeScript, text)
}

pub fn default_engine() -> Engine {
    Engine::new(ValidatedConfig::default())
}

/// Engine over a raw config that is expected to validate.
pub fn engine_with(config: SmellmapConfig) -> Engine {
    Engine::new(config.validate().expect("test config should validate"))
}

pub fn analyze(inputs: &[SourceInput]) -> Report {
    default_engine().analyze_batch(inputs)
}

pub fn entries_of(report: &Report, rule: RuleId) -> Vec<&ReportEntry> {
    report
        .entries()
        .iter()
        .filter(|entry| entry.rule_id == rule)
        .collect()
}

/// A function with `count` straight-line statements.
pub fn straight_line_function(name: &str, count: usize) -> String {
    let mut source = format!("function {name}() {{\n");
    for i in 0..count {
        source.push_str(&format!("    let v{i} = {i};\n"));
    }
    source.push_str("}\n");
    source
}

pub const ORDER_SOURCE: &str = r#"
function createOrder(street, city, state, zipCode, country, items, userId) {
    return { items, userId };
}

function updateUserAddress(userId, street, city, state, zipCode, country) {
    return userId;
}
"#;

pub const PAYMENT_SOURCE: &str = r#"
class PaymentProcessor {
    process(payment) {
        if (payment.type === "card") {
            return this.chargeCard(payment);
        } else if (payment.type === "paypal") {
            return this.chargePaypal(payment);
        } else if (payment.type === "bank") {
            return this.chargeBank(payment);
        } else if (payment.type === "crypto") {
            return this.chargeCrypto(payment);
        } else if (payment.type === "voucher") {
            return this.redeem(payment);
        }
        return null;
    }
}
"#;

pub const INVOICE_SOURCE: &str = r#"
class InvoiceRenderer {
    render(order) {
        return this.format(order.id, order.total, order.items, order.customer, order.date, order.status);
    }
}
"#;
