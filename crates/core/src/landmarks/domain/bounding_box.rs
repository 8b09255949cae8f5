use crate::landmarks::domain::hand_landmarks::LandmarkPoint;
use crate::shared::error::SignError;

/// Axis-aligned box around a hand, recomputed every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    /// Smallest box containing every point: `(min_x, min_y, max_x - min_x, max_y - min_y)`.
    pub fn from_points(points: &[LandmarkPoint]) -> Result<Self, SignError> {
        let first = points
            .first()
            .ok_or_else(|| SignError::invalid("cannot bound an empty point set"))?;

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Ok(Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }
}
