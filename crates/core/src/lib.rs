//! Static hand sign recognition from per-frame hand keypoints.
//!
//! Keypoints are normalized into a translation- and scale-invariant
//! feature vector, classified by a pretrained model behind the
//! [`classification::domain::sign_classifier::SignClassifier`] port, and
//! optionally appended to a labeled dataset while in capture mode.

pub mod capture;
pub mod classification;
pub mod landmarks;
pub mod pipeline;
pub mod shared;
