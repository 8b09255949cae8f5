use crate::shared::constants::FEATURE_LEN;
use crate::shared::error::SignError;

/// Normalized hand pose: 21 `(dx, dy)` wrist offsets, flattened and
/// scaled so every element lies in `[-1, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_LEN],
}

impl FeatureVector {
    pub(crate) fn new(values: [f64; FEATURE_LEN]) -> Self {
        Self { values }
    }

    /// Wraps externally produced values, checking length, range and that
    /// the wrist offset (first two elements) is zero.
    pub fn try_from_slice(values: &[f64]) -> Result<Self, SignError> {
        let values: [f64; FEATURE_LEN] = values.try_into().map_err(|_| {
            SignError::invalid(format!(
                "expected {FEATURE_LEN} features, got {}",
                values.len()
            ))
        })?;
        if let Some(v) = values.iter().find(|v| !(-1.0..=1.0).contains(*v)) {
            return Err(SignError::invalid(format!(
                "feature value {v} outside [-1, 1]"
            )));
        }
        if values[0] != 0.0 || values[1] != 0.0 {
            return Err(SignError::invalid(format!(
                "wrist features must be 0, got ({}, {})",
                values[0], values[1]
            )));
        }
        Ok(Self { values })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Single-precision copy for model input.
    pub fn to_f32(&self) -> [f32; FEATURE_LEN] {
        self.values.map(|v| v as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_try_from_slice_accepts_42_values() {
        let mut values = vec![0.5; FEATURE_LEN];
        values[0] = 0.0;
        values[1] = 0.0;
        let fv = FeatureVector::try_from_slice(&values).unwrap();
        assert_eq!(fv.as_slice().len(), FEATURE_LEN);
    }

    #[test]
    fn test_try_from_slice_rejects_wrong_length() {
        let err = FeatureVector::try_from_slice(&[0.0; 41]).unwrap_err();
        assert!(matches!(err, SignError::InvalidInput(_)));
    }

    #[test]
    fn test_try_from_slice_rejects_out_of_range_and_nan() {
        let mut values = vec![0.0; FEATURE_LEN];
        values[3] = 1.5;
        assert!(FeatureVector::try_from_slice(&values).is_err());
        values[3] = f64::NAN;
        assert!(FeatureVector::try_from_slice(&values).is_err());
    }

    #[rstest]
    #[case(0.1, 0.0)]
    #[case(0.0, -0.5)]
    #[case(1.0, 1.0)]
    fn test_try_from_slice_rejects_nonzero_wrist(#[case] dx: f64, #[case] dy: f64) {
        let mut values = vec![0.0; FEATURE_LEN];
        values[0] = dx;
        values[1] = dy;
        values[5] = 0.5;
        let err = FeatureVector::try_from_slice(&values).unwrap_err();
        assert!(matches!(err, SignError::InvalidInput(_)));
    }

    #[test]
    fn test_to_f32_preserves_order() {
        let mut values = [0.0; FEATURE_LEN];
        values[41] = -1.0;
        let fv = FeatureVector::new(values);
        let single = fv.to_f32();
        assert_eq!(single[41], -1.0);
        assert_eq!(single[0], 0.0);
    }
}
