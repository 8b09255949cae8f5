//! 21-point hand keypoints in frame pixel space.
//!
//! Index order follows the canonical hand topology and is never
//! reordered downstream: 0 is the wrist, then four joints per finger
//! from thumb to pinky, each ending at the fingertip.

use crate::shared::constants::NUM_LANDMARKS;
use crate::shared::error::SignError;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Integer pixel coordinates within the owning frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LandmarkPoint {
    pub x: i32,
    pub y: i32,
}

impl LandmarkPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts a fractional detector coordinate into a pixel position.
    ///
    /// Uses `min(trunc(f * dim), dim - 1)` per axis, clamped below at 0 so
    /// detections slightly outside the frame stay on it.
    pub fn from_fractional(fx: f64, fy: f64, width: u32, height: u32) -> Self {
        Self {
            x: to_pixel(fx, width),
            y: to_pixel(fy, height),
        }
    }
}

fn to_pixel(fraction: f64, dimension: u32) -> i32 {
    let max = i32::try_from(dimension.saturating_sub(1)).unwrap_or(i32::MAX);
    // `as` saturates on overflow and maps NaN to 0.
    ((fraction * dimension as f64) as i32).clamp(0, max)
}

/// Exactly 21 keypoints of one detected hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandLandmarkSet {
    points: [LandmarkPoint; NUM_LANDMARKS],
}

impl HandLandmarkSet {
    pub fn new(points: [LandmarkPoint; NUM_LANDMARKS]) -> Self {
        Self { points }
    }

    /// Builds a set from pixel points, rejecting anything but 21 of them.
    pub fn from_points(points: &[LandmarkPoint]) -> Result<Self, SignError> {
        let points: [LandmarkPoint; NUM_LANDMARKS] = points.try_into().map_err(|_| {
            SignError::invalid(format!(
                "expected {NUM_LANDMARKS} landmarks, got {}",
                points.len()
            ))
        })?;
        Ok(Self { points })
    }

    /// Builds a set from the detector's fractional `(x, y)` pairs for a
    /// frame of the given size.
    pub fn from_normalized(
        coords: &[(f64, f64)],
        width: u32,
        height: u32,
    ) -> Result<Self, SignError> {
        if width == 0 || height == 0 {
            return Err(SignError::invalid(format!(
                "frame dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let points: Vec<LandmarkPoint> = coords
            .iter()
            .map(|&(fx, fy)| LandmarkPoint::from_fractional(fx, fy, width, height))
            .collect();
        Self::from_points(&points)
    }

    pub fn points(&self) -> &[LandmarkPoint; NUM_LANDMARKS] {
        &self.points
    }

    pub fn wrist(&self) -> LandmarkPoint {
        self.points[WRIST]
    }

    pub fn fingertips(&self) -> [LandmarkPoint; 5] {
        FINGERTIPS.map(|i| self.points[i])
    }
}
