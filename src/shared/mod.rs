/// Shared module for cross-cutting concerns
///
/// Contains the error taxonomy, the crate-wide `Result` alias and
/// filesystem safety checks used by the adapters.
pub mod error;
pub mod result;
pub mod security;

pub use result::Result;
