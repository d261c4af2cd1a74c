//! End-to-end loader tests over CSV fixtures written to a temp directory.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use esbmap_core::{ColumnProjection, SourceKind};
use esbmap_loader::{
    load_bundle, write_matches_csv, DatasetLoader, DiagnosticsSink, LoadReport, LoaderError,
    NullSink, SourcePaths, DEFAULT_CACHE_CAPACITY,
};

const ESB_CSV: &str = "\
latitude,longitude,brandName,address
-6.2,106.8,Kopi A,Jl. Sudirman 1
,106.81,Kopi B,Jl. Thamrin 2
-6.22,106.82,,
-6.23,106.83,Kopi D,Jl. Gatot Subroto 4
";

const SCRAPER_CSV: &str = "\
brandName,latitude,longitude,rating
Kopi A,-6.21,106.81,4.5
Kopi E,-6.24,,4.0
";

const MATCH_CSV: &str = "\
latitude_esb,longitude_esb,latitude_pulau,longitude_pulau,brandName_esb,brandName_pulau,match_confidence,distance_m,exact_brand_match
-6.2,106.8,-6.21,106.81,Kopi A,Kopi A,0.9,140,True
,106.8,-6.21,106.81,Kopi B,Kopi B,0.8,90,False
-6.23,106.83,-6.23,106.83,Kopi D,Kopi D,0.4,10,False
";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn fixture(dir: &Path) -> SourcePaths {
    SourcePaths {
        esb: write(dir, "esb.csv", ESB_CSV),
        scraper: write(dir, "scraper.csv", SCRAPER_CSV),
        matches: write(dir, "matches.csv", MATCH_CSV),
    }
}

fn cap(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("non-zero cap")
}

#[derive(Default)]
struct RecordingSink {
    mismatches: Mutex<Vec<(SourceKind, Vec<String>)>>,
    loaded: Mutex<Vec<(SourceKind, ColumnProjection)>>,
    reports: Mutex<Vec<LoadReport>>,
    failures: Mutex<Vec<String>>,
}

impl DiagnosticsSink for RecordingSink {
    fn schema_mismatch(&self, kind: SourceKind, _path: &Path, available: &[&str]) {
        self.mismatches.lock().unwrap().push((
            kind,
            available.iter().map(|s| (*s).to_string()).collect(),
        ));
    }

    fn columns_loaded(&self, kind: SourceKind, _path: &Path, columns: &ColumnProjection) {
        self.loaded.lock().unwrap().push((kind, columns.clone()));
    }

    fn load_finished(&self, report: &LoadReport) {
        self.reports.lock().unwrap().push(report.clone());
    }

    fn load_failed(&self, error: &LoaderError) {
        self.failures.lock().unwrap().push(error.to_string());
    }
}

#[test]
fn loads_all_three_sources_and_drops_null_points() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = load_bundle(&fixture(dir.path()), cap(1000), &NullSink);
    assert!(outcome.error.is_none(), "unexpected error: {:?}", outcome.error);

    let bundle = outcome.bundle;
    assert_eq!(bundle.esb.len(), 3);
    assert_eq!(bundle.scraper.len(), 1);
    assert_eq!(bundle.matches.len(), 3);
    assert!(bundle
        .esb
        .iter()
        .chain(bundle.scraper.iter())
        .all(|r| r.latitude.is_finite() && r.longitude.is_finite()));
    assert!(bundle.esb.records()[1].brand_name.is_none());
}

#[test]
fn caps_points_at_max_and_matches_at_half() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = load_bundle(&fixture(dir.path()), cap(3), &NullSink);
    let bundle = outcome.bundle;
    // First three ESB rows read, one of them null.
    assert_eq!(bundle.esb.len(), 2);
    assert!(bundle.scraper.len() <= 3);
    assert_eq!(bundle.matches.len(), 1);
}

#[test]
fn cap_of_one_loads_no_matches() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = load_bundle(&fixture(dir.path()), cap(1), &NullSink).bundle;
    assert_eq!(bundle.esb.len(), 1);
    assert!(bundle.matches.is_empty());
}

#[test]
fn match_rows_with_null_coordinates_survive_loading() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = load_bundle(&fixture(dir.path()), cap(100), &NullSink).bundle;
    let second = &bundle.matches.records()[1];
    assert!(second.latitude_esb.is_none());
    assert_eq!(second.match_confidence, Some(0.8));
}

#[test]
fn schema_mismatch_empties_only_that_source() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = fixture(dir.path());
    paths.scraper = write(dir.path(), "scraper.csv", "lat,lng\n-6.2,106.8\n");
    let sink = RecordingSink::default();

    let outcome = load_bundle(&paths, cap(100), &sink);

    assert!(outcome.error.is_none());
    assert!(outcome.bundle.scraper.is_empty());
    assert_eq!(outcome.bundle.esb.len(), 3);
    assert_eq!(outcome.bundle.matches.len(), 3);

    let mismatches = sink.mismatches.lock().unwrap();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].0, SourceKind::Scraper);
    assert_eq!(mismatches[0].1, vec!["lat", "lng"]);

    let err = outcome.into_primary().unwrap_err();
    assert!(matches!(
        err,
        LoaderError::PrimaryEmpty {
            esb: 3,
            scraper: 0
        }
    ));
}

#[test]
fn missing_file_empties_every_source() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = fixture(dir.path());
    paths.matches = dir.path().join("missing.csv");
    let sink = RecordingSink::default();

    let outcome = load_bundle(&paths, cap(100), &sink);

    assert!(outcome.bundle.esb.is_empty());
    assert!(outcome.bundle.scraper.is_empty());
    assert!(outcome.bundle.matches.is_empty());
    assert!(matches!(
        outcome.error,
        Some(LoaderError::MissingSource {
            kind: SourceKind::Matches,
            ..
        })
    ));
    assert_eq!(sink.failures.lock().unwrap().len(), 1);
    assert!(sink.reports.lock().unwrap().is_empty());
}

#[test]
fn undecodable_match_file_empties_every_source() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = fixture(dir.path());
    let mut contents = MATCH_CSV.lines().next().unwrap().as_bytes().to_vec();
    contents.extend_from_slice(b"\n-6.2,106.8,-6.21,106.81,Kopi \xff\xfe,Kopi A,0.9,140,True\n");
    paths.matches = dir.path().join("latin1.csv");
    fs::write(&paths.matches, contents).unwrap();
    let sink = RecordingSink::default();

    let outcome = load_bundle(&paths, cap(10), &sink);

    assert!(outcome.bundle.esb.is_empty());
    assert!(outcome.bundle.scraper.is_empty());
    assert!(outcome.bundle.matches.is_empty());
    assert!(matches!(
        outcome.error,
        Some(LoaderError::Unreadable {
            kind: SourceKind::Matches,
            ..
        })
    ));
    assert_eq!(sink.failures.lock().unwrap().len(), 1);
    assert!(sink.reports.lock().unwrap().is_empty());
}

#[test]
fn sink_receives_loaded_columns_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let sink = RecordingSink::default();
    let outcome = load_bundle(&fixture(dir.path()), cap(100), &sink);

    let loaded = sink.loaded.lock().unwrap();
    let kinds: Vec<_> = loaded.iter().map(|(k, _)| *k).collect();
    assert_eq!(kinds, SourceKind::ALL.to_vec());
    assert_eq!(
        loaded[1].1.columns(),
        &["latitude", "longitude", "brandName"]
    );

    let reports = sink.reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].sources[0].records, outcome.bundle.esb.len());
    assert!(reports[0].approx_bytes > 0);
}

#[test]
fn result_does_not_depend_on_sink() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fixture(dir.path());
    let quiet = load_bundle(&paths, cap(100), &NullSink).bundle;
    let recorded = load_bundle(&paths, cap(100), &RecordingSink::default()).bundle;
    assert_eq!(*quiet, *recorded);
}

#[test]
fn loader_reuses_cached_bundle_until_sources_change() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fixture(dir.path());
    let loader = DatasetLoader::with_sink(paths.clone(), Arc::new(NullSink));

    let first = loader.load(cap(100));
    let second = loader.load(cap(100));
    assert!(Arc::ptr_eq(&first.bundle, &second.bundle));

    let other_cap = loader.load(cap(2));
    assert!(!Arc::ptr_eq(&first.bundle, &other_cap.bundle));

    write(
        dir.path(),
        "esb.csv",
        "latitude,longitude,brandName\n-6.3,106.7,Kopi Z\n",
    );
    let reloaded = loader.load(cap(100));
    assert!(!Arc::ptr_eq(&first.bundle, &reloaded.bundle));
    assert_eq!(reloaded.bundle.esb.len(), 1);
}

#[test]
fn invalidate_forces_reload() {
    let dir = tempfile::tempdir().unwrap();
    let loader = DatasetLoader::with_sink(fixture(dir.path()), Arc::new(NullSink));
    let first = loader.load(cap(100));
    loader.invalidate();
    let second = loader.load(cap(100));
    assert!(!Arc::ptr_eq(&first.bundle, &second.bundle));
    assert_eq!(*first.bundle, *second.bundle);
}

#[test]
fn many_distinct_caps_keep_the_cache_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let loader = DatasetLoader::with_sink(fixture(dir.path()), Arc::new(NullSink));

    for n in 1..=50 {
        assert!(loader.load(cap(n)).error.is_none());
    }

    let latest = loader.load(cap(50));
    let again = loader.load(cap(50));
    assert!(Arc::ptr_eq(&latest.bundle, &again.bundle));
    assert!(format!("{loader:?}").contains(&format!("cached_entries: {DEFAULT_CACHE_CAPACITY}")));
}

#[test]
fn failed_loads_are_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = fixture(dir.path());
    paths.esb = dir.path().join("late.csv");
    let loader = DatasetLoader::with_sink(paths, Arc::new(NullSink));

    assert!(loader.load(cap(100)).error.is_some());

    write(dir.path(), "late.csv", ESB_CSV);
    let outcome = loader.load(cap(100));
    assert!(outcome.error.is_none());
    assert_eq!(outcome.bundle.esb.len(), 3);
}

#[test]
fn exported_matches_reload_with_same_layout() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fixture(dir.path());
    let bundle = load_bundle(&paths, cap(100), &NullSink).bundle;

    let mut buf = Vec::new();
    write_matches_csv(&bundle.matches, &mut buf).unwrap();
    let exported = String::from_utf8(buf).unwrap();
    let header = exported.lines().next().unwrap();
    assert_eq!(header, MATCH_CSV.lines().next().unwrap());

    let reexported = SourcePaths {
        matches: write(dir.path(), "reexported.csv", &exported),
        ..paths
    };
    let reloaded = load_bundle(&reexported, cap(100), &NullSink).bundle;
    assert_eq!(reloaded.matches, bundle.matches);
}
