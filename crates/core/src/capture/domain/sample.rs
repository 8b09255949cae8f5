use crate::landmarks::domain::feature_vector::FeatureVector;
use crate::shared::constants::MAX_LABEL_ID;
use crate::shared::error::SignError;

/// A labeled feature vector destined for the training dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    label_id: u8,
    feature: FeatureVector,
}

impl Sample {
    pub fn new(label_id: u8, feature: FeatureVector) -> Result<Self, SignError> {
        if label_id > MAX_LABEL_ID {
            return Err(SignError::invalid(format!(
                "label id {label_id} outside 0..={MAX_LABEL_ID}"
            )));
        }
        Ok(Self { label_id, feature })
    }

    pub fn label_id(&self) -> u8 {
        self.label_id
    }

    pub fn feature(&self) -> &FeatureVector {
        &self.feature
    }

    /// Comma-separated row: the integer label followed by the 42 features.
    ///
    /// Features always carry a decimal point (`0.0`, `-1.0`).
    pub fn to_row(&self) -> String {
        let mut row = self.label_id.to_string();
        for v in self.feature.as_slice() {
            row.push(',');
            row.push_str(&format!("{v:?}"));
        }
        row
    }

    /// Parses a row written by [`Sample::to_row`] (or any equivalent CSV).
    pub fn parse_row(row: &str) -> Result<Self, SignError> {
        let mut fields = row.trim().split(',');
        let label_field = fields.next().unwrap_or_default().trim();
        let label_id: u8 = label_field
            .parse()
            .map_err(|_| SignError::invalid(format!("bad label id {label_field:?}")))?;
        let values = fields
            .map(|f| {
                f.trim()
                    .parse::<f64>()
                    .map_err(|_| SignError::invalid(format!("bad feature value {f:?}")))
            })
            .collect::<Result<Vec<f64>, SignError>>()?;
        Self::new(label_id, FeatureVector::try_from_slice(&values)?)
    }
}
