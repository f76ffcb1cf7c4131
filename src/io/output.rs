use crate::errors::Result;
use crate::metrics::MetricsRecord;
use crate::report::Report;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub trait OutputWriter {
    fn write_report(&mut self, report: &Report) -> Result<()>;
    fn write_metrics(&mut self, records: &[MetricsRecord]) -> Result<()>;
}

/// Pretty JSON followed by a newline.
pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_json<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &Report) -> Result<()> {
        self.write_json(report)
    }

    fn write_metrics(&mut self, records: &[MetricsRecord]) -> Result<()> {
        self.write_json(records)
    }
}

/// A writer to `path`, or to stdout when there is none.
pub fn create_writer(path: Option<&Path>) -> Result<Box<dyn OutputWriter>> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            Ok(Box::new(JsonWriter::new(BufWriter::new(file))))
        }
        None => Ok(Box::new(JsonWriter::new(io::stdout()))),
    }
}
