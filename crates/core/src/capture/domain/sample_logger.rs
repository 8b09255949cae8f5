use crate::capture::domain::dataset_writer::DatasetWriter;
use crate::capture::domain::mode_controller::{Mode, ModeState};
use crate::capture::domain::sample::Sample;
use crate::landmarks::domain::feature_vector::FeatureVector;
use crate::shared::constants::MAX_LABEL_ID;

/// Label to record this frame, if any: only in capture mode and only on
/// the frame a letter key was pressed.
pub fn capture_label(state: &ModeState) -> Option<u8> {
    match (state.mode, state.pending_label) {
        (Mode::Capture, Some(label)) if label <= MAX_LABEL_ID => Some(label),
        _ => None,
    }
}

/// Writes one sample per letter keypress while in capture mode.
pub struct SampleLogger {
    writer: Box<dyn DatasetWriter>,
    written: usize,
}

impl SampleLogger {
    pub fn new(writer: Box<dyn DatasetWriter>) -> Self {
        Self { writer, written: 0 }
    }

    /// Appends `feature` under the pending label when the state calls
    /// for it. Returns whether a row was written; not writing is the
    /// normal case, not an error.
    pub fn log(
        &mut self,
        state: &ModeState,
        feature: &FeatureVector,
    ) -> Result<bool, Box<dyn std::error::Error>> {
        let Some(label) = capture_label(state) else {
            return Ok(false);
        };
        let sample = Sample::new(label, feature.clone())?;
        self.writer.append(&sample)?;
        self.written += 1;
        log::info!("Captured sample for label {label} ({} this session)", self.written);
        Ok(true)
    }

    pub fn written(&self) -> usize {
        self.written
    }
}
