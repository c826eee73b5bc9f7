/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// The analysis core reaches the forest walker, release-id resolvers, the
/// console and the output destination only through these traits.
pub mod forest_walker;
pub mod formatter;
pub mod output_presenter;
pub mod progress_reporter;
pub mod release_id_resolver;

pub use forest_walker::{ForestVisitor, ForestWalker, WalkedNode};
pub use formatter::ReportFormatter;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use release_id_resolver::ReleaseIdResolver;
