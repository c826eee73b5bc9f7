/// Release analysis domain layer
///
/// Pure business logic: the data model and the graph, ordering and
/// deduplication services. Nothing here performs I/O.
pub mod domain;
pub mod services;
