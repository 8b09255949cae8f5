//! Hand sign classifier using ONNX Runtime via `ort`.
//!
//! The model takes a `[1, 42]` float tensor of normalized landmark
//! offsets and returns one probability-like score per class.
use std::path::Path;

use ndarray::Array2;

use crate::classification::domain::sign_classifier::{ClassificationResult, SignClassifier};
use crate::classification::infrastructure::execution_provider::session_builder;
use crate::landmarks::domain::feature_vector::FeatureVector;
use crate::shared::constants::FEATURE_LEN;

pub struct OnnxSignClassifier {
    session: ort::session::Session,
    class_count: Option<usize>,
}

impl OnnxSignClassifier {
    /// Load a classifier model with the given intra-op thread count.
    pub fn new(model_path: &Path, num_threads: usize) -> Result<Self, Box<dyn std::error::Error>> {
        let session = session_builder(num_threads)?.commit_from_file(model_path)?;
        log::info!(
            "Loaded sign classifier {} ({num_threads} thread(s))",
            model_path.display()
        );
        Ok(Self {
            session,
            class_count: None,
        })
    }

    fn scores(&mut self, features: &FeatureVector) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        let input = to_input_tensor(features)?;
        let input_value = ort::value::Tensor::from_array(input)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("classifier model produced no outputs".into());
        }
        let scores = outputs[0].try_extract_array::<f32>()?;
        Ok(scores.iter().copied().collect())
    }
}

impl SignClassifier for OnnxSignClassifier {
    fn classify(
        &mut self,
        features: &FeatureVector,
    ) -> Result<ClassificationResult, Box<dyn std::error::Error>> {
        let scores = self.scores(features)?;
        Ok(ClassificationResult::from_scores(&scores)?)
    }

    fn class_count(&mut self) -> Result<usize, Box<dyn std::error::Error>> {
        if let Some(count) = self.class_count {
            return Ok(count);
        }
        // Probe with the neutral pose; only the output width matters.
        let count = self.scores(&FeatureVector::new([0.0; FEATURE_LEN]))?.len();
        self.class_count = Some(count);
        Ok(count)
    }
}

/// Batch-of-one, row-major `[1, 42]` tensor.
fn to_input_tensor(features: &FeatureVector) -> Result<Array2<f32>, ndarray::ShapeError> {
    Array2::from_shape_vec((1, FEATURE_LEN), features.to_f32().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_tensor_shape() {
        let tensor = to_input_tensor(&FeatureVector::new([0.0; FEATURE_LEN])).unwrap();
        assert_eq!(tensor.shape(), &[1, FEATURE_LEN]);
    }

    #[test]
    fn test_input_tensor_preserves_order() {
        let mut values = [0.0; FEATURE_LEN];
        values[5] = 0.5;
        values[41] = -1.0;
        let tensor = to_input_tensor(&FeatureVector::new(values)).unwrap();
        assert_eq!(tensor[[0, 5]], 0.5);
        assert_eq!(tensor[[0, 41]], -1.0);
    }

    #[test]
    fn test_missing_model_fails_to_load() {
        let result = OnnxSignClassifier::new(Path::new("/nonexistent/model.onnx"), 1);
        assert!(result.is_err());
    }
}
