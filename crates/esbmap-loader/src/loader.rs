//! The dataset loader: three sources in, one [`DatasetBundle`] out.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use esbmap_core::{AppConfig, DatasetBundle, LocationRecord, MatchRecord, SourceKind};

use crate::cache::{LoadCache, SourceIdentity};
use crate::diagnostics::{DiagnosticsSink, LoadReport, TracingSink};
use crate::error::LoaderError;
use crate::source::read_source;

/// Locations of the three input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub esb: PathBuf,
    pub scraper: PathBuf,
    pub matches: PathBuf,
}

impl SourcePaths {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            esb: config.esb_path.clone(),
            scraper: config.scraper_path.clone(),
            matches: config.match_path.clone(),
        }
    }
}

/// Result of one load. The bundle is always present; on failure it is empty
/// for all three sources and `error` says why.
#[derive(Debug)]
pub struct LoadOutcome {
    pub bundle: Arc<DatasetBundle>,
    pub error: Option<LoaderError>,
}

impl LoadOutcome {
    fn failed(error: LoaderError) -> Self {
        Self {
            bundle: Arc::new(DatasetBundle::empty()),
            error: Some(error),
        }
    }

    /// The bundle, if it is fit to render: loading succeeded and both point
    /// sources have records. An empty match collection is acceptable.
    ///
    /// # Errors
    ///
    /// Returns the load error, or [`LoaderError::PrimaryEmpty`] when the ESB
    /// or Scraper collection is empty.
    pub fn into_primary(self) -> Result<Arc<DatasetBundle>, LoaderError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.bundle.has_primary_data() {
            return Err(LoaderError::PrimaryEmpty {
                esb: self.bundle.esb.len(),
                scraper: self.bundle.scraper.len(),
            });
        }
        Ok(self.bundle)
    }
}

/// Load all three sources without caching.
///
/// ESB and Scraper are capped at `max_points` rows, matches at
/// `max_points / 2`. Any source that cannot be opened or read empties the
/// whole bundle.
#[must_use]
pub fn load_bundle(
    paths: &SourcePaths,
    max_points: NonZeroUsize,
    sink: &dyn DiagnosticsSink,
) -> LoadOutcome {
    let started = Instant::now();
    let point_cap = max_points.get();
    let match_cap = point_cap / 2;

    let loaded = read_all(paths, point_cap, match_cap, sink);

    match loaded {
        Ok(bundle) => {
            sink.load_finished(&LoadReport::new(&bundle, started.elapsed()));
            LoadOutcome {
                bundle: Arc::new(bundle),
                error: None,
            }
        }
        Err(error) => {
            sink.load_failed(&error);
            LoadOutcome::failed(error)
        }
    }
}

fn read_all(
    paths: &SourcePaths,
    point_cap: usize,
    match_cap: usize,
    sink: &dyn DiagnosticsSink,
) -> Result<DatasetBundle, LoaderError> {
    Ok(DatasetBundle {
        esb: read_source::<LocationRecord>(SourceKind::Esb, &paths.esb, point_cap, sink)?,
        scraper: read_source::<LocationRecord>(
            SourceKind::Scraper,
            &paths.scraper,
            point_cap,
            sink,
        )?,
        matches: read_source::<MatchRecord>(SourceKind::Matches, &paths.matches, match_cap, sink)?,
    })
}

/// Loader bound to one set of source paths, memoizing successful loads.
pub struct DatasetLoader {
    paths: SourcePaths,
    sink: Arc<dyn DiagnosticsSink>,
    cache: LoadCache,
}

impl std::fmt::Debug for DatasetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetLoader")
            .field("paths", &self.paths)
            .field("cached_entries", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl DatasetLoader {
    /// A loader reporting through [`TracingSink`].
    #[must_use]
    pub fn new(paths: SourcePaths) -> Self {
        Self::with_sink(paths, Arc::new(TracingSink))
    }

    #[must_use]
    pub fn with_sink(paths: SourcePaths, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            paths,
            sink,
            cache: LoadCache::new(),
        }
    }

    #[must_use]
    pub fn paths(&self) -> &SourcePaths {
        &self.paths
    }

    /// Load the bundle for `max_points`, reusing a cached bundle when the
    /// sources are unchanged since it was read.
    #[must_use]
    pub fn load(&self, max_points: NonZeroUsize) -> LoadOutcome {
        let identity = SourceIdentity::probe(&self.paths);

        if let Some(identity) = &identity {
            if let Some(bundle) = self.cache.get(identity, max_points.get()) {
                tracing::debug!(max_points = max_points.get(), "dataset bundle served from cache");
                return LoadOutcome {
                    bundle,
                    error: None,
                };
            }
        }

        let outcome = load_bundle(&self.paths, max_points, self.sink.as_ref());

        if let (Some(identity), None) = (identity, &outcome.error) {
            self.cache
                .store(identity, max_points.get(), Arc::clone(&outcome.bundle));
        }
        outcome
    }

    /// Drop every cached bundle so the next load re-reads the sources.
    pub fn invalidate(&self) {
        self.cache.clear();
    }
}
