pub mod label_table;
pub mod sign_classifier;
