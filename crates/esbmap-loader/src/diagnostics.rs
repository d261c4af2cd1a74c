//! Side-channel reporting for the loader.
//!
//! Nothing reported here feeds back into the loaded bundle; swapping the sink
//! for [`NullSink`] changes only what gets logged.

use std::mem::size_of;
use std::path::Path;
use std::time::Duration;

use esbmap_core::{Collection, ColumnProjection, DatasetBundle, LocationRecord, MatchRecord, SourceKind};

use crate::error::LoaderError;

/// Per-source line of a [`LoadReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct SourceReport {
    pub kind: SourceKind,
    pub columns: ColumnProjection,
    pub records: usize,
}

/// Summary emitted once per successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub sources: Vec<SourceReport>,
    /// Approximate heap + inline footprint of the loaded records.
    pub approx_bytes: usize,
    pub elapsed: Duration,
}

impl LoadReport {
    #[must_use]
    pub fn new(bundle: &DatasetBundle, elapsed: Duration) -> Self {
        let sources = SourceKind::ALL
            .iter()
            .map(|&kind| SourceReport {
                kind,
                columns: bundle.projection(kind).clone(),
                records: bundle.len_of(kind),
            })
            .collect();

        Self {
            sources,
            approx_bytes: approx_bundle_bytes(bundle),
            elapsed,
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn approx_megabytes(&self) -> f64 {
        self.approx_bytes as f64 / (1024.0 * 1024.0)
    }
}

fn text_bytes(value: Option<&String>) -> usize {
    value.map_or(0, String::capacity)
}

fn approx_bundle_bytes(bundle: &DatasetBundle) -> usize {
    let points = |c: &Collection<LocationRecord>| {
        c.len() * size_of::<LocationRecord>()
            + c.iter()
                .map(|r| text_bytes(r.brand_name.as_ref()) + text_bytes(r.address.as_ref()))
                .sum::<usize>()
    };
    let matches = |c: &Collection<MatchRecord>| {
        c.len() * size_of::<MatchRecord>()
            + c.iter()
                .map(|m| {
                    text_bytes(m.brand_name_esb.as_ref())
                        + text_bytes(m.brand_name_pulau.as_ref())
                        + text_bytes(m.branch_name_esb.as_ref())
                        + text_bytes(m.match_level.as_ref())
                })
                .sum::<usize>()
    };

    points(&bundle.esb) + points(&bundle.scraper) + matches(&bundle.matches)
}

/// Receiver of loader diagnostics. Every method defaults to a no-op.
pub trait DiagnosticsSink: Send + Sync {
    /// A source header shares no column with its expected list.
    fn schema_mismatch(&self, _kind: SourceKind, _path: &Path, _available: &[&str]) {}

    /// A source was read through `columns`.
    fn columns_loaded(&self, _kind: SourceKind, _path: &Path, _columns: &ColumnProjection) {}

    fn load_finished(&self, _report: &LoadReport) {}

    fn load_failed(&self, _error: &LoaderError) {}
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {}

/// Emits notifications as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn schema_mismatch(&self, kind: SourceKind, path: &Path, available: &[&str]) {
        tracing::warn!(
            source = %kind,
            path = %path.display(),
            available = ?available,
            "no expected columns found in source; loading it as empty"
        );
    }

    fn columns_loaded(&self, kind: SourceKind, path: &Path, columns: &ColumnProjection) {
        tracing::info!(
            source = %kind,
            path = %path.display(),
            columns = ?columns.columns(),
            "source columns loaded"
        );
    }

    fn load_finished(&self, report: &LoadReport) {
        for source in &report.sources {
            tracing::debug!(
                source = %source.kind,
                records = source.records,
                columns = ?source.columns.columns(),
                "source loaded"
            );
        }
        tracing::info!(
            approx_mb = report.approx_megabytes(),
            elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
            "dataset bundle loaded"
        );
    }

    fn load_failed(&self, error: &LoaderError) {
        tracing::error!(error = %error, "dataset bundle failed to load");
    }
}
