use std::path::Path;

use serde::{Deserialize, Serialize};

/// One polled frame as seen by the core: the frame size, the key read
/// on that frame (if any), and the fractional keypoints of every hand
/// the detector found.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameObservation {
    #[serde(default)]
    pub index: usize,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub key: Option<i32>,
    #[serde(default)]
    pub hands: Vec<Vec<(f64, f64)>>,
}

/// Metadata about an opened landmark stream.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMetadata {
    pub source_name: String,
    /// Known frame count, if the source is finite and pre-scanned.
    pub total_frames: Option<usize>,
}

/// Produces per-frame hand detections in capture order.
///
/// Stands in for camera capture + hand detector; implementations may
/// replay recordings or wrap a live detector.
pub trait LandmarkSource: Send {
    fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>>;

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<FrameObservation, Box<dyn std::error::Error>>> + '_>;

    fn close(&mut self);
}
