//! Serializing a match collection back to its source column layout.

use std::io;

use esbmap_core::columns::{
    ADDRESS_COMMON_WORDS, BRANCH_NAME_ESB, BRAND_NAME_ESB, BRAND_NAME_PULAU, DISTANCE_M,
    EXACT_BRAND_MATCH, LATITUDE_ESB, LATITUDE_PULAU, LONGITUDE_ESB, LONGITUDE_PULAU,
    MATCH_CONFIDENCE, MATCH_LEVEL,
};
use esbmap_core::{Collection, MatchRecord};

use crate::error::LoaderError;

fn number(value: Option<f32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn cell(record: &MatchRecord, column: &str) -> String {
    match column {
        LATITUDE_ESB => number(record.latitude_esb),
        LONGITUDE_ESB => number(record.longitude_esb),
        LATITUDE_PULAU => number(record.latitude_pulau),
        LONGITUDE_PULAU => number(record.longitude_pulau),
        BRAND_NAME_ESB => record.brand_name_esb.clone().unwrap_or_default(),
        BRAND_NAME_PULAU => record.brand_name_pulau.clone().unwrap_or_default(),
        MATCH_CONFIDENCE => number(record.match_confidence),
        DISTANCE_M => number(record.distance_m),
        EXACT_BRAND_MATCH => match record.exact_brand_match {
            Some(true) => "True".to_string(),
            Some(false) => "False".to_string(),
            None => String::new(),
        },
        BRANCH_NAME_ESB => record.branch_name_esb.clone().unwrap_or_default(),
        MATCH_LEVEL => record.match_level.clone().unwrap_or_default(),
        ADDRESS_COMMON_WORDS => number(record.address_common_words),
        _ => String::new(),
    }
}

/// Write `matches` as CSV using exactly the columns it was loaded with.
/// Nulls become empty cells. A collection with no columns writes nothing.
///
/// # Errors
///
/// Returns [`LoaderError::Export`] if writing to `writer` fails.
pub fn write_matches_csv<W: io::Write>(
    matches: &Collection<MatchRecord>,
    writer: W,
) -> Result<(), LoaderError> {
    let columns = matches.projection().columns();
    if columns.is_empty() {
        return Ok(());
    }

    let mut out = csv::Writer::from_writer(writer);
    out.write_record(columns)?;
    for record in matches {
        out.write_record(columns.iter().map(|column| cell(record, column)))?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}
