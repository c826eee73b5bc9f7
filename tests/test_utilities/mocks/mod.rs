/// Mock implementations for testing
mod mock_forest_walker;
mod mock_progress_reporter;
mod mock_release_resolver;

pub use mock_forest_walker::{component, MockForestWalker, MockNode};
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_release_resolver::MockReleaseIdResolver;
