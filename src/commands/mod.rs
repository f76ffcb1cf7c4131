//! CLI command implementations.
//!
//! - **analyze**: detect smells and write the JSON report
//! - **metrics**: write per-declaration metrics
//! - **init**: create a default `.smellmap.toml`

pub mod analyze;
pub mod init;
pub mod metrics;

pub use analyze::{analyze_project, AnalyzeConfig};
pub use init::{init_config, init_config_in, DEFAULT_CONFIG};
pub use metrics::{measure_project, MetricsConfig};

use crate::config::{load_config, SmellmapConfig};
use anyhow::{Context, Result};
use std::path::Path;

/// The explicit config file, or the nearest one above the working directory.
pub(crate) fn resolve_config(explicit: Option<&Path>) -> Result<SmellmapConfig> {
    let cwd = std::env::current_dir().context("failed to determine the current directory")?;
    Ok(load_config(explicit, &cwd)?)
}
