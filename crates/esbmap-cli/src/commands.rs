//! Command handlers. Each one loads the bundle once, applies the match
//! filter and then produces its own output.

use std::fmt::Write;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use esbmap_core::{
    match_details, Collection, DatasetBundle, DatasetCounts, MatchDetail, MatchRecord,
    MatchSummary,
};
use esbmap_loader::{write_matches_csv, DatasetLoader};

use crate::settings::RunSettings;
use crate::OutputFormat;

const NAME_WIDTH: usize = 30;

struct Prepared {
    bundle: Arc<DatasetBundle>,
    matches: Collection<MatchRecord>,
}

fn prepare(settings: &RunSettings) -> anyhow::Result<Prepared> {
    let loader = DatasetLoader::new(settings.paths.clone());
    let bundle = loader
        .load(settings.max_points)
        .into_primary()
        .context("datasets could not be loaded")?;
    let matches = settings.filter.apply(&bundle.matches);
    tracing::debug!(
        total = bundle.matches.len(),
        kept = matches.len(),
        min_confidence = settings.filter.min_confidence(),
        max_distance = settings.filter.max_distance(),
        "applied match filter"
    );
    Ok(Prepared { bundle, matches })
}

/// Build the map and write it to `out`.
///
/// # Errors
///
/// Returns an error if loading fails or the output file cannot be written.
pub(crate) fn run_render(
    settings: &RunSettings,
    out: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let Prepared { bundle, matches } = prepare(settings)?;
    let document = esbmap_map::build(&bundle.esb, &bundle.scraper, &matches);

    let contents = match format {
        OutputFormat::Html => esbmap_map::render_html(&document),
        OutputFormat::Json => serde_json::to_string_pretty(&document)?,
    };
    std::fs::write(out, contents)
        .with_context(|| format!("failed to write map to {}", out.display()))?;

    tracing::info!(
        path = %out.display(),
        elements = document.element_count(),
        "map written"
    );
    println!("map written to {}", out.display());
    Ok(())
}

/// Print counts, match statistics and the `top` most confident matches.
///
/// # Errors
///
/// Returns an error if loading fails.
pub(crate) fn run_summary(settings: &RunSettings, top: usize) -> anyhow::Result<()> {
    let Prepared { bundle, matches } = prepare(settings)?;
    let counts = DatasetCounts::new(&bundle, &matches);
    let summary = MatchSummary::from_matches(&matches);
    let details = match_details(&matches);
    let mut text = String::new();
    write_summary(&mut text, &counts, &summary, &details, top)?;
    print!("{text}");
    Ok(())
}

/// Write the filtered matches to `out` as CSV.
///
/// # Errors
///
/// Returns an error if loading fails or the file cannot be written.
pub(crate) fn run_export(settings: &RunSettings, out: &Path) -> anyhow::Result<()> {
    let Prepared { matches, .. } = prepare(settings)?;
    let file =
        File::create(out).with_context(|| format!("failed to create {}", out.display()))?;
    write_matches_csv(&matches, BufWriter::new(file))?;

    tracing::info!(path = %out.display(), rows = matches.len(), "matches exported");
    println!("{} matches written to {}", matches.len(), out.display());
    Ok(())
}

fn truncate(name: Option<&str>) -> String {
    let name = name.unwrap_or("-");
    if name.chars().count() > NAME_WIDTH - 2 {
        format!("{}...", name.chars().take(NAME_WIDTH - 5).collect::<String>())
    } else {
        name.to_string()
    }
}

fn fmt_metric(value: Option<f64>, precision: usize, unit: &str) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}{unit}"))
}

fn write_summary(
    out: &mut impl Write,
    counts: &DatasetCounts,
    summary: &MatchSummary,
    details: &[MatchDetail],
    top: usize,
) -> std::fmt::Result {
    writeln!(out, "{:<16}RECORDS", "DATASET")?;
    writeln!(out, "{:<16}{}", "ESB", counts.esb)?;
    writeln!(out, "{:<16}{}", "Scraper", counts.scraper)?;
    writeln!(out, "{:<16}{}", "Matches", counts.filtered_matches)?;
    writeln!(out)?;
    writeln!(out, "Exact brand matches: {}", summary.exact_matches)?;
    writeln!(
        out,
        "Mean distance:       {}",
        fmt_metric(summary.mean_distance_m, 1, " m")
    )?;
    writeln!(
        out,
        "Mean confidence:     {}",
        fmt_metric(summary.mean_confidence, 3, "")
    )?;

    if details.is_empty() || top == 0 {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(
        out,
        "{:<w$}{:<w$}{:<12}DISTANCE",
        "BRAND (ESB)",
        "BRAND (SCRAPER)",
        "CONFIDENCE",
        w = NAME_WIDTH
    )?;
    for detail in details.iter().take(top) {
        writeln!(
            out,
            "{:<w$}{:<w$}{:<12}{}",
            truncate(detail.brand_name_esb.as_deref()),
            truncate(detail.brand_name_pulau.as_deref()),
            fmt_metric(detail.match_confidence.map(f64::from), 3, ""),
            fmt_metric(detail.distance_m.map(f64::from), 1, " m"),
            w = NAME_WIDTH
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(brand: &str, confidence: Option<f32>) -> MatchDetail {
        MatchDetail {
            brand_name_esb: Some(brand.to_string()),
            brand_name_pulau: None,
            match_confidence: confidence,
            distance_m: Some(12.0),
        }
    }

    fn format_summary(
        counts: &DatasetCounts,
        summary: &MatchSummary,
        details: &[MatchDetail],
        top: usize,
    ) -> String {
        let mut text = String::new();
        write_summary(&mut text, counts, summary, details, top).unwrap();
        text
    }

    /// Accepts `limit` bytes, then refuses every further write.
    struct FullWriter {
        limit: usize,
        written: usize,
    }

    impl Write for FullWriter {
        fn write_str(&mut self, s: &str) -> std::fmt::Result {
            if self.written + s.len() > self.limit {
                return Err(std::fmt::Error);
            }
            self.written += s.len();
            Ok(())
        }
    }

    fn counts() -> DatasetCounts {
        DatasetCounts {
            esb: 3,
            scraper: 4,
            filtered_matches: 2,
        }
    }

    #[test]
    fn summary_lists_counts_and_top_rows() {
        let summary = MatchSummary {
            match_count: 2,
            exact_matches: 1,
            mean_distance_m: Some(12.0),
            mean_confidence: Some(0.85),
        };
        let details = vec![detail("Kopi Kenangan", Some(0.9)), detail("Janji Jiwa", Some(0.8))];

        let text = format_summary(&counts(), &summary, &details, 1);

        assert!(text.contains("ESB             3"));
        assert!(text.contains("Scraper         4"));
        assert!(text.contains("Exact brand matches: 1"));
        assert!(text.contains("Mean distance:       12.0 m"));
        assert!(text.contains("Mean confidence:     0.850"));
        assert!(text.contains("Kopi Kenangan"));
        assert!(!text.contains("Janji Jiwa"));
    }

    #[test]
    fn summary_without_matches_omits_table() {
        let summary = MatchSummary {
            match_count: 0,
            exact_matches: 0,
            mean_distance_m: None,
            mean_confidence: None,
        };
        let text = format_summary(&counts(), &summary, &[], 10);
        assert!(text.contains("Mean distance:       -"));
        assert!(!text.contains("BRAND (ESB)"));
    }

    #[test]
    fn write_failure_is_reported() {
        let summary = MatchSummary {
            match_count: 1,
            exact_matches: 1,
            mean_distance_m: Some(12.0),
            mean_confidence: Some(0.9),
        };
        let details = vec![detail("Kopi Kenangan", Some(0.9))];
        let mut out = FullWriter {
            limit: 40,
            written: 0,
        };

        let result = write_summary(&mut out, &counts(), &summary, &details, 5);

        assert!(result.is_err());
        assert!(out.written <= 40);
    }

    #[test]
    fn long_names_are_truncated() {
        let name = "A".repeat(40);
        let shown = truncate(Some(&name));
        assert!(shown.ends_with("..."));
        assert!(shown.chars().count() < NAME_WIDTH);
        assert_eq!(truncate(None), "-");
    }
}
