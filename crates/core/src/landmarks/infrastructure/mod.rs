pub mod jsonl_landmark_source;
