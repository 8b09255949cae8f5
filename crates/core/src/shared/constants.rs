/// Keypoints per detected hand.
pub const NUM_LANDMARKS: usize = 21;

/// Feature vector length: one (dx, dy) pair per landmark.
pub const FEATURE_LEN: usize = NUM_LANDMARKS * 2;

/// Minimum top score for a prediction to be accepted.
pub const CONFIDENCE_THRESHOLD: f32 = 0.25;

/// Highest label id a sample may carry ('a'..='z' → 0..=25).
pub const MAX_LABEL_ID: u8 = 25;

/// Key code the session loop treats as a terminate request (ESC).
pub const KEY_ESCAPE: i32 = 27;

pub const CLASSIFIER_MODEL_NAME: &str = "handsign_classifier.onnx";
pub const BUNDLED_MODEL_DIR: &str = "model";
pub const DEFAULT_LABELS_PATH: &str = "model/handsign_labels.csv";
pub const DEFAULT_DATASET_PATH: &str = "model/handsign_data.csv";
pub const DEFAULT_NUM_THREADS: usize = 1;
