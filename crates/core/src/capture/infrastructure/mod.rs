pub mod csv_dataset_writer;
pub mod dataset_summary;
