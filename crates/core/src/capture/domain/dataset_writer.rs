use crate::capture::domain::sample::Sample;

/// Append-only persistence for captured samples.
///
/// Each call appends exactly one row; rows are never rewritten.
pub trait DatasetWriter: Send {
    fn append(&mut self, sample: &Sample) -> Result<(), Box<dyn std::error::Error>>;
}
