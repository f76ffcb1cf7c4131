use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    Javascript,
    Typescript,
}

#[derive(Parser, Debug)]
#[command(name = "smellmap")]
#[command(about = "Code smell detector for JavaScript and TypeScript", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect code smells and print a JSON report
    Analyze {
        /// Files or directories to analyze
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Configuration file (defaults to the nearest .smellmap.toml)
        #[arg(short, long, env = "SMELLMAP_CONFIG")]
        config: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat every file as this language instead of using its extension
        #[arg(long, value_enum)]
        language: Option<LanguageArg>,

        /// Rules to run, overriding the config file
        #[arg(long, value_delimiter = ',')]
        rules: Option<Vec<String>>,

        /// Worker threads
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Per-file analysis budget in milliseconds
        #[arg(long = "timeout-ms")]
        timeout_ms: Option<u64>,

        /// Exit with status 2 when the report is not empty
        #[arg(long = "fail-on-findings")]
        fail_on_findings: bool,

        /// Increase log verbosity (-v, -vv, -vvv)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Print per-declaration metrics as JSON
    Metrics {
        /// Files or directories to measure
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Configuration file (defaults to the nearest .smellmap.toml)
        #[arg(short, long, env = "SMELLMAP_CONFIG")]
        config: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Increase log verbosity (-v, -vv, -vvv)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Write a default .smellmap.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
