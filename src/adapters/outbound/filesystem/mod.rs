/// Filesystem adapters for file I/O operations
mod file_writer;
mod forest_document;

pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use forest_document::{DocumentFormat, DocumentForestWalker};
