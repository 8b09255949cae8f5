use ort::session::builder::SessionBuilder;
use ort::session::Session;

/// Return the preferred ONNX execution providers for the current platform.
///
/// ONNX Runtime falls back to CPU if the platform provider is unavailable.
pub fn preferred_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}

/// Session builder with platform providers and an intra-op thread hint.
pub fn session_builder(num_threads: usize) -> Result<SessionBuilder, Box<dyn std::error::Error>> {
    let builder = Session::builder()?
        .with_execution_providers(preferred_execution_providers())?
        .with_intra_threads(num_threads.max(1))?;
    Ok(builder)
}
