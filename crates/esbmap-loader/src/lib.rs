//! Schema-tolerant CSV loading for the ESB, Scraper and Match sources.
//!
//! Each source is projected onto the subset of its expected columns that its
//! header actually carries. A source without any expected column loads as an
//! empty collection; a source that cannot be opened fails the whole bundle.

pub mod cache;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod loader;
mod row;
mod source;

pub use cache::{LoadCache, SourceIdentity, DEFAULT_CACHE_CAPACITY};
pub use diagnostics::{DiagnosticsSink, LoadReport, NullSink, SourceReport, TracingSink};
pub use error::LoaderError;
pub use export::write_matches_csv;
pub use loader::{load_bundle, DatasetLoader, LoadOutcome, SourcePaths};
