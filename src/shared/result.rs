/// Type alias for Result with anyhow::Error as the error type.
/// Domain errors are `AnalysisError` values carried inside the anyhow chain.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
