use super::resolve_config;
use crate::cli::LanguageArg;
use crate::core::Language;
use crate::io::{collect_source_files, create_writer};
use crate::pipeline::{Engine, SourceInput};
use crate::report::Report;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct AnalyzeConfig {
    pub paths: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub language: Option<LanguageArg>,
    pub rules: Option<Vec<String>>,
    pub jobs: Option<usize>,
    pub timeout_ms: Option<u64>,
}

/// Analyzes every source file under `config.paths` and writes the report.
///
/// Only configuration and output problems are errors; per-file faults are
/// entries of the returned report.
pub fn analyze_project(config: AnalyzeConfig) -> Result<Report> {
    let mut raw = resolve_config(config.config.as_deref())?;
    if let Some(rules) = config.rules {
        raw.rules.enabled = Some(rules);
    }
    if let Some(jobs) = config.jobs {
        raw.analysis.jobs = Some(jobs);
    }
    if let Some(timeout_ms) = config.timeout_ms {
        raw.analysis.timeout_ms = timeout_ms;
    }
    let validated = raw.validate()?;

    let files = collect_source_files(&config.paths, &validated.ignore_patterns)?;
    info!(files = files.len(), "analyzing source files");
    let inputs: Vec<SourceInput> = files.into_iter().map(SourceInput::Path).collect();

    let mut engine = Engine::new(validated);
    if let Some(language) = config.language {
        engine = engine.with_language(language_of(language));
    }
    let report = engine.analyze_batch(&inputs);
    info!(entries = report.len(), "analysis complete");

    let mut writer = create_writer(config.output.as_deref()).context("failed to open output")?;
    writer.write_report(&report)?;

    Ok(report)
}

fn language_of(arg: LanguageArg) -> Language {
    match arg {
        LanguageArg::Javascript => Language::JavaScript,
        LanguageArg::Typescript => Language::TypeScript,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RuleId;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_analyze_writes_report_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("order.js");
        fs::write(
            &source,
            "function createOrder(street, city, state, zipCode, country) {}\n",
        )
        .unwrap();
        let config_path = dir.path().join("smellmap.toml");
        fs::write(&config_path, "[rules]\nenabled = [\"primitive-obsession\"]\n").unwrap();
        let output = dir.path().join("report.json");

        let report = analyze_project(AnalyzeConfig {
            paths: vec![dir.path().to_path_buf()],
            config: Some(config_path),
            output: Some(output.clone()),
            ..AnalyzeConfig::default()
        })
        .unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report.entries()[0].rule_id, RuleId::PrimitiveObsession);
        let written = fs::read_to_string(output).unwrap();
        assert!(written.contains("\"ruleId\": \"primitive-obsession\""));
    }

    #[test]
    fn test_invalid_rule_override_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("smellmap.toml");
        fs::write(&config_path, "").unwrap();

        let err = analyze_project(AnalyzeConfig {
            paths: vec![dir.path().to_path_buf()],
            config: Some(config_path),
            rules: Some(vec!["not-a-rule".into()]),
            output: Some(dir.path().join("out.json")),
            ..AnalyzeConfig::default()
        })
        .unwrap_err();

        assert!(err.to_string().contains("rules.enabled"));
    }
}
