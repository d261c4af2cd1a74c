//! Reading one CSV source through its column projection.

use std::fs::File;
use std::io;
use std::path::Path;

use esbmap_core::{Collection, ColumnProjection, SourceKind};

use crate::diagnostics::DiagnosticsSink;
use crate::error::LoaderError;
use crate::row::{ColumnPositions, FromRow, Row};

fn open(kind: SourceKind, path: &Path) -> Result<File, LoaderError> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoaderError::MissingSource {
            kind,
            path: path.display().to_string(),
        },
        _ => unreadable(kind, path, csv::Error::from(e)),
    })
}

fn unreadable(kind: SourceKind, path: &Path, source: csv::Error) -> LoaderError {
    LoaderError::Unreadable {
        kind,
        path: path.display().to_string(),
        source,
    }
}

/// Read up to `limit` data rows of `path`, converting each through
/// [`FromRow`]. The limit counts rows read from the file, so rows dropped
/// by the conversion still use up the budget.
///
/// A header with none of the expected columns yields an empty collection
/// and a schema-mismatch notification rather than an error.
pub(crate) fn read_source<T: FromRow>(
    kind: SourceKind,
    path: &Path,
    limit: usize,
    sink: &dyn DiagnosticsSink,
) -> Result<Collection<T>, LoaderError> {
    let file = open(kind, path)?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(io::BufReader::new(file));

    let header = reader
        .headers()
        .map_err(|e| unreadable(kind, path, e))?
        .clone();
    let available: Vec<&str> = header.iter().collect();
    let projection = ColumnProjection::resolve(T::EXPECTED_COLUMNS, &available);

    if projection.is_empty() {
        sink.schema_mismatch(kind, path, &available);
        return Ok(Collection::empty());
    }

    let positions = ColumnPositions::new(&projection, &header);
    let records = reader
        .records()
        .take(limit)
        .filter_map(|cells| match cells {
            Ok(cells) => T::from_row(&Row::new(&cells, &positions)).map(Ok),
            Err(e) => Some(Err(unreadable(kind, path, e))),
        })
        .collect::<Result<Vec<T>, LoaderError>>()?;

    sink.columns_loaded(kind, path, &projection);
    Ok(Collection::new(projection, records))
}
