use super::resolve_config;
use crate::io::{collect_source_files, create_writer};
use crate::metrics::{metrics_records, MetricsRecord};
use crate::pipeline::{Engine, SourceInput};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct MetricsConfig {
    pub paths: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Writes the metrics of every declaration found under `config.paths`.
/// Files that cannot be parsed are skipped with a warning.
pub fn measure_project(config: MetricsConfig) -> Result<Vec<MetricsRecord>> {
    let validated = resolve_config(config.config.as_deref())?.validate()?;
    let files = collect_source_files(&config.paths, &validated.ignore_patterns)?;
    let engine = Engine::new(validated);

    let records: Vec<MetricsRecord> = files
        .into_par_iter()
        .map(SourceInput::Path)
        .flat_map_iter(|input| match engine.measure(&input) {
            Ok((unit, metrics)) => metrics_records(&unit, &metrics),
            Err(fault) => {
                warn!(file = %input.file_id(), "skipping: {fault}");
                Vec::new()
            }
        })
        .collect();

    let mut writer = create_writer(config.output.as_deref()).context("failed to open output")?;
    writer.write_metrics(&records)?;

    Ok(records)
}
