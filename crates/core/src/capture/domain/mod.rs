pub mod dataset_writer;
pub mod mode_controller;
pub mod sample;
pub mod sample_logger;
