use anyhow::Result;
use clap::Parser;
use smellmap::cli::{Cli, Commands};
use smellmap::commands::{analyze_project, init_config, measure_project, AnalyzeConfig, MetricsConfig};
use smellmap::observability::init_tracing;

/// Exit status when `--fail-on-findings` is set and the report is not empty.
const FINDINGS_EXIT_CODE: i32 = 2;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            paths,
            config,
            output,
            language,
            rules,
            jobs,
            timeout_ms,
            fail_on_findings,
            verbosity,
        } => {
            init_tracing(verbosity);
            let report = analyze_project(AnalyzeConfig {
                paths,
                config,
                output,
                language,
                rules,
                jobs,
                timeout_ms,
            })?;

            if fail_on_findings && !report.is_empty() {
                std::process::exit(FINDINGS_EXIT_CODE);
            }
            Ok(())
        }
        Commands::Metrics {
            paths,
            config,
            output,
            verbosity,
        } => {
            init_tracing(verbosity);
            measure_project(MetricsConfig {
                paths,
                config,
                output,
            })?;
            Ok(())
        }
        Commands::Init { force } => init_config(force),
    }
}
