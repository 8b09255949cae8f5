use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::capture::domain::sample::Sample;
use crate::shared::error::SignError;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {source}")]
    Row {
        line: usize,
        #[source]
        source: SignError,
    },
}

/// Per-label sample counts of a dataset file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub counts: BTreeMap<u8, usize>,
}

impl DatasetSummary {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Counts rows per label; blank lines are skipped, malformed rows fail.
    pub fn scan(path: &Path) -> Result<Self, DatasetError> {
        let read_err = |e| DatasetError::Read {
            path: path.to_path_buf(),
            source: e,
        };
        let reader = BufReader::new(File::open(path).map_err(read_err)?);

        let mut summary = Self::default();
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(read_err)?;
            if line.trim().is_empty() {
                continue;
            }
            let sample = Sample::parse_row(&line).map_err(|e| DatasetError::Row {
                line: i + 1,
                source: e,
            })?;
            *summary.counts.entry(sample.label_id()).or_default() += 1;
        }
        Ok(summary)
    }
}
