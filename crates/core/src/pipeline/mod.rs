pub mod pipeline_logger;
pub mod recognize_signs_use_case;
