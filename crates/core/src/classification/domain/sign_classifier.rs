use crate::landmarks::domain::feature_vector::FeatureVector;
use crate::shared::constants::CONFIDENCE_THRESHOLD;
use crate::shared::error::SignError;

/// Outcome of classifying one feature vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassificationResult {
    /// Index of the top-scoring class, or `None` when its score is below
    /// [`CONFIDENCE_THRESHOLD`].
    pub label: Option<usize>,
    /// Top score, reported even when the label is rejected.
    pub confidence: f32,
}

impl ClassificationResult {
    /// Picks the arg-max of `scores` and applies the confidence gate.
    ///
    /// Ties resolve to the lowest index.
    pub fn from_scores(scores: &[f32]) -> Result<Self, SignError> {
        if scores.is_empty() {
            return Err(SignError::invalid("classifier produced no scores"));
        }
        if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
            return Err(SignError::invalid(format!(
                "classifier produced non-finite score {bad}"
            )));
        }

        let (best, confidence) = scores
            .iter()
            .copied()
            .enumerate()
            .fold((0, scores[0]), |(bi, bs), (i, s)| {
                if s > bs {
                    (i, s)
                } else {
                    (bi, bs)
                }
            });

        let label = (confidence >= CONFIDENCE_THRESHOLD).then_some(best);
        Ok(Self { label, confidence })
    }
}

/// Domain interface for hand sign classification.
///
/// Each call is independent; implementations must not carry results
/// from one vector to the next. `&mut self` only reflects that model
/// runtimes need exclusive access while running.
pub trait SignClassifier: Send {
    fn classify(
        &mut self,
        features: &FeatureVector,
    ) -> Result<ClassificationResult, Box<dyn std::error::Error>>;

    /// Number of classes the model scores.
    fn class_count(&mut self) -> Result<usize, Box<dyn std::error::Error>>;
}
