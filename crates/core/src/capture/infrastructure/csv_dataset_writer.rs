use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::capture::domain::dataset_writer::DatasetWriter;
use crate::capture::domain::sample::Sample;

/// Appends samples as CSV rows to a dataset file.
///
/// The file is opened in append mode per sample and each row is written
/// with a single `write_all`, so an interrupted session loses at most
/// the row in flight.
pub struct CsvDatasetWriter {
    path: PathBuf,
}

impl CsvDatasetWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetWriter for CsvDatasetWriter {
    fn append(&mut self, sample: &Sample) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut row = sample.to_row();
        row.push('\n');
        file.write_all(row.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}
