pub mod output;
pub mod walker;

pub use output::{create_writer, JsonWriter, OutputWriter};
pub use walker::{collect_source_files, FileWalker};

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}
