use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// CI systems use these to tell an analysis that found a fatal condition
/// (cycles, resolution failures) apart from a tool or usage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Analysis completed without fatal findings
    Success = 0,
    /// Analysis completed but found a fatal condition (cycles, failed nodes)
    FatalAnalysis = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (file I/O, parse error, invariant violation, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::FatalAnalysis => write!(f, "Fatal Analysis Finding (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for release-forest analysis.
///
/// Uses thiserror to derive Display and Error; every message carries a hint
/// where the operator can act on it.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Forest document not found: {path}\n\n💡 Hint: {suggestion}")]
    ForestNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse forest document: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the document is valid JSON, YAML or TOML")]
    ForestParseError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to resolve release revision for {component}\nDetails: {details}\n\n💡 Hint: Declare an scm block for the component or add a release rule for its group")]
    Resolution { component: String, details: String },

    #[error("Found {count} circular release dependency chain(s):\n{chains}\n\n💡 Hint: Re-run with --warn-on-cycles to produce a report anyway")]
    CircularDependency { count: usize, chains: String },

    #[error("Internal invariant violated: {details}")]
    InvariantViolation { details: String },

    /// Validation error for builder patterns and configuration
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

impl AnalysisError {
    pub fn invariant(details: impl Into<String>) -> Self {
        AnalysisError::InvariantViolation {
            details: details.into(),
        }
    }
}
