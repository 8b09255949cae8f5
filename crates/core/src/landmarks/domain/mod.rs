pub mod bounding_box;
pub mod feature_vector;
pub mod hand_landmarks;
pub mod landmark_normalizer;
pub mod landmark_source;
