use thiserror::Error;

/// Failures of the per-frame core: shape checks, normalization and
/// label lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignError {
    /// Wrong-shaped landmark, feature or score data.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// All landmarks coincide, so there is no scale to normalize by.
    #[error("degenerate input: landmarks have zero extent")]
    DegenerateInput,
    /// A class index beyond the label table.
    #[error("index {index} out of range for {len} labels")]
    OutOfRange { index: usize, len: usize },
}

impl SignError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
