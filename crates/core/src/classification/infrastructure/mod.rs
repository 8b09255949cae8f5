pub mod execution_provider;
pub mod onnx_sign_classifier;
