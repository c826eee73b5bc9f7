use crate::shared::Result;

/// OutputPresenter port for the final report destination (stdout, file, ...)
pub trait OutputPresenter {
    /// Presents the formatted report
    ///
    /// # Errors
    /// Returns an error if writing to the destination fails
    fn present(&self, content: &str) -> Result<()>;
}
