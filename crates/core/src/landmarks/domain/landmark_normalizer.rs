//! Translation- and scale-invariant encoding of a hand pose.
//!
//! The wrist is moved to the origin, offsets are flattened in landmark
//! order, and everything is divided by the largest absolute offset. A
//! uniform shift cancels in the first step and a uniform positive scale
//! cancels in the last, so the same sign yields the same vector at any
//! distance or position in frame.

use crate::landmarks::domain::feature_vector::FeatureVector;
use crate::landmarks::domain::hand_landmarks::HandLandmarkSet;
use crate::shared::constants::FEATURE_LEN;
use crate::shared::error::SignError;

/// Encodes `set` as a 42-element feature vector.
///
/// Returns [`SignError::DegenerateInput`] when all landmarks coincide.
pub fn normalize(set: &HandLandmarkSet) -> Result<FeatureVector, SignError> {
    let wrist = set.wrist();

    let mut values = [0.0f64; FEATURE_LEN];
    for (i, p) in set.points().iter().enumerate() {
        values[2 * i] = (p.x - wrist.x) as f64;
        values[2 * i + 1] = (p.y - wrist.y) as f64;
    }

    let scale = values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if scale == 0.0 {
        return Err(SignError::DegenerateInput);
    }
    for v in &mut values {
        *v /= scale;
    }

    Ok(FeatureVector::new(values))
}
