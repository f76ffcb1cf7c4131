mod common;

use common::*;
use indoc::indoc;
use smellmap::commands::{analyze_project, AnalyzeConfig};
use smellmap::config::{load_config, load_config_from, CONFIG_FILE_NAME};
use smellmap::core::RuleId;
use smellmap::errors::ConfigFault;
use smellmap::io::collect_source_files;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_thresholds_from_file_change_results() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(
        &path,
        indoc! {r#"
            [thresholds]
            long_method_statements = 5

            [rules]
            enabled = ["long-method"]
        "#},
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();
    let report = engine_with(config).analyze_batch(&[js(
        "short.js",
        &straight_line_function("setup", 6),
    )]);

    assert_eq!(report.len(), 1);
    assert_eq!(report.entries()[0].rule_id, RuleId::LongMethod);
}

#[test]
fn test_config_is_found_in_parent_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("packages").join("web").join("src");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[analysis]\ntimeout_ms = 250\n",
    )
    .unwrap();

    let config = load_config(None, &nested).unwrap();
    assert_eq!(config.analysis.timeout_ms, 250);
}

#[test]
fn test_invalid_value_fails_before_analysis() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("order.js"), ORDER_SOURCE).unwrap();
    let config_path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&config_path, "[thresholds]\nfeature_envy_ratio = 1.5\n").unwrap();
    let output = dir.path().join("report.json");

    let err = analyze_project(AnalyzeConfig {
        paths: vec![dir.path().to_path_buf()],
        config: Some(config_path),
        output: Some(output.clone()),
        ..AnalyzeConfig::default()
    })
    .unwrap_err();

    let fault = err.downcast_ref::<ConfigFault>().expect("a config fault");
    assert_eq!(fault.field(), Some("thresholds.feature_envy_ratio"));
    assert!(!output.exists());
}

#[test]
fn test_unknown_key_is_a_syntax_fault() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[thresholds]\nlong_method_lines = 10\n").unwrap();

    assert!(matches!(
        load_config_from(&path),
        Err(ConfigFault::Syntax { .. })
    ));
}

#[test]
fn test_ignore_patterns_skip_files() {
    let dir = TempDir::new().unwrap();
    let vendor = dir.path().join("vendor");
    fs::create_dir_all(&vendor).unwrap();
    fs::write(dir.path().join("app.js"), "function a() {}\n").unwrap();
    fs::write(dir.path().join("types.ts"), "function b() {}\n").unwrap();
    fs::write(vendor.join("lib.js"), "function c() {}\n").unwrap();
    fs::write(dir.path().join("README.md"), "# readme\n").unwrap();

    let patterns = vec![glob::Pattern::new("vendor/**").unwrap()];
    let files = collect_source_files(&[dir.path().to_path_buf()], &patterns).unwrap();

    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["app.js", "types.ts"]);
}
