use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::error::SignError;

#[derive(Error, Debug)]
pub enum LabelTableError {
    #[error("failed to read label table {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("label table is empty")]
    Empty,
    #[error("label table has {labels} labels but the classifier outputs {classes} classes")]
    TooShort { labels: usize, classes: usize },
}

/// Display names for class ids, in class-id order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn load(path: &Path) -> Result<Self, LabelTableError> {
        let text = fs::read_to_string(path).map_err(|e| LabelTableError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let table = Self::parse(&text)?;
        log::debug!("Loaded {} labels from {}", table.len(), path.display());
        Ok(table)
    }

    /// One label per line; line index is the class id. Trailing blank
    /// lines are ignored, interior ones are kept as empty names.
    pub fn parse(text: &str) -> Result<Self, LabelTableError> {
        let mut labels: Vec<String> = text.lines().map(|l| l.trim().to_string()).collect();
        while labels.last().is_some_and(|l| l.is_empty()) {
            labels.pop();
        }
        if labels.is_empty() {
            return Err(LabelTableError::Empty);
        }
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn name(&self, index: usize) -> Result<&str, SignError> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or(SignError::OutOfRange {
                index,
                len: self.labels.len(),
            })
    }

    /// Startup check that every class the classifier can emit has a name.
    pub fn ensure_covers(&self, classes: usize) -> Result<(), LabelTableError> {
        if self.labels.len() < classes {
            return Err(LabelTableError::TooShort {
                labels: self.labels.len(),
                classes,
            });
        }
        Ok(())
    }
}
