use crate::model::{Observation, RecordError};
use csv::WriterBuilder;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Spreadsheet tools need the BOM to read Vietnamese text as UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Written,
    SkippedNoPrice,
}

/// Append-only CSV history of observations.
pub struct CsvObservationLog {
    path: PathBuf,
}

impl CsvObservationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row. Observations without a price are dropped and the
    /// file is left untouched. A missing or empty file gets the BOM and the
    /// header row first.
    pub fn record(&self, observation: &Observation) -> Result<RecordOutcome, RecordError> {
        if observation.price.is_none() {
            return Ok(RecordOutcome::SkippedNoPrice);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let needs_header = fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if needs_header {
            file.write_all(UTF8_BOM)?;
        }

        let mut writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(observation)?;
        writer.flush()?;

        Ok(RecordOutcome::Written)
    }
}
