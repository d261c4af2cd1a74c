use esbmap_core::SourceKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("{kind} source not found: {path}")]
    MissingSource { kind: SourceKind, path: String },

    #[error("failed to read {kind} source {path}: {source}")]
    Unreadable {
        kind: SourceKind,
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Loading succeeded but one of the point sources has no usable rows.
    #[error("primary datasets are empty (esb: {esb} records, scraper: {scraper} records)")]
    PrimaryEmpty { esb: usize, scraper: usize },

    #[error("failed to write CSV export: {0}")]
    Export(#[from] csv::Error),
}
