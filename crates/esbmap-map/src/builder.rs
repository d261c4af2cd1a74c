use esbmap_core::{Collection, GeoPoint, LocationRecord, MatchRecord};

use crate::center::center_of;
use crate::document::{
    CircleMarker, Element, Layer, LayerKind, MapDocument, Polyline, Popup, Style, POPUP_MAX_WIDTH,
};
use crate::error::MapError;
use crate::popup;

const POINT_RADIUS: f32 = 4.0;
const MATCH_POINT_RADIUS: f32 = 6.0;

/// Orange for ESB, blue for Scraper.
const fn point_style(color: &'static str) -> Style {
    Style {
        color,
        fill_color: Some(color),
        fill_opacity: Some(0.7),
        opacity: None,
        weight: Some(1.0),
    }
}

const fn match_point_style(color: &'static str) -> Style {
    Style {
        color,
        fill_color: Some(color),
        fill_opacity: Some(0.9),
        opacity: None,
        weight: None,
    }
}

const EDGE_STYLE: Style = Style {
    color: "green",
    fill_color: None,
    fill_opacity: None,
    opacity: Some(0.6),
    weight: Some(2.0),
};

fn bounded_popup(html: String) -> Popup {
    Popup {
        html,
        max_width: Some(POPUP_MAX_WIDTH),
    }
}

/// Popup title and marker color for one point source.
#[derive(Clone, Copy)]
struct PointSource {
    kind: LayerKind,
    title: &'static str,
    color: &'static str,
}

const ESB_POINTS: PointSource = PointSource {
    kind: LayerKind::Esb,
    title: "ESB",
    color: "orange",
};

const SCRAPER_POINTS: PointSource = PointSource {
    kind: LayerKind::Scraper,
    title: "Scraper",
    color: "blue",
};

fn point_marker(source: PointSource, record: &LocationRecord) -> Option<Element> {
    let location = record.point();
    if !location.is_valid() {
        return None;
    }
    let PointSource { title, color, .. } = source;
    let brand = record.brand_name.as_deref();

    Some(Element::CircleMarker(CircleMarker {
        location,
        radius: POINT_RADIUS,
        style: point_style(color),
        popup: bounded_popup(popup::point_popup(title, brand, record.address.as_deref())),
        tooltip: Some(popup::point_tooltip(title, brand)),
    }))
}

fn match_endpoint(
    location: GeoPoint,
    title: &str,
    color: &'static str,
    brand: Option<&str>,
) -> Element {
    Element::CircleMarker(CircleMarker {
        location,
        radius: MATCH_POINT_RADIUS,
        style: match_point_style(color),
        popup: bounded_popup(popup::endpoint_popup(title, brand)),
        tooltip: None,
    })
}

/// Edge plus both endpoint markers, or nothing when either end is missing
/// or off the map.
fn match_elements(record: &MatchRecord) -> Option<[Element; 3]> {
    let (esb, pulau) = record.endpoints()?;
    if !esb.is_valid() || !pulau.is_valid() {
        return None;
    }
    let brand_esb = record.brand_name_esb.as_deref();
    let brand_pulau = record.brand_name_pulau.as_deref();

    let edge = Element::Polyline(Polyline {
        locations: [esb, pulau],
        style: EDGE_STYLE,
        popup: bounded_popup(popup::edge_popup(
            record.match_confidence,
            record.distance_m,
            brand_esb,
            brand_pulau,
        )),
    });

    Some([
        edge,
        match_endpoint(esb, "ESB Match", "green", brand_esb),
        match_endpoint(pulau, "Scraper Match", "darkgreen", brand_pulau),
    ])
}

fn point_layer(source: PointSource, records: &Collection<LocationRecord>) -> Layer {
    let elements: Vec<Element> = records
        .iter()
        .filter_map(|r| point_marker(source, r))
        .collect();
    let skipped = records.len() - elements.len();
    if skipped > 0 {
        tracing::debug!(
            layer = source.title,
            skipped,
            "skipped points with unusable coordinates"
        );
    }
    Layer::clustered(source.kind, elements)
}

fn match_layer(matches: &Collection<MatchRecord>) -> Layer {
    let mut elements = Vec::with_capacity(matches.len() * 3);
    let mut skipped = 0_usize;
    for record in matches {
        match match_elements(record) {
            Some(group) => elements.extend(group),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, "skipped matches with missing endpoints");
    }
    Layer::clustered(LayerKind::Matches, elements)
}

/// Builds the three-layer map document.
///
/// # Errors
///
/// Returns [`MapError::InvalidCenter`] when the computed center is not a
/// placeable coordinate. [`center_of`] only averages valid points, so an
/// unplaceable point is skipped on its own and never costs the other layers.
pub fn try_build(
    esb: &Collection<LocationRecord>,
    scraper: &Collection<LocationRecord>,
    matches: &Collection<MatchRecord>,
) -> Result<MapDocument, MapError> {
    let center = center_of(esb, scraper);
    if !center.is_valid() {
        return Err(MapError::InvalidCenter {
            latitude: center.latitude,
            longitude: center.longitude,
        });
    }

    let layers = vec![
        point_layer(ESB_POINTS, esb),
        point_layer(SCRAPER_POINTS, scraper),
        match_layer(matches),
    ];
    Ok(MapDocument::new(center, layers))
}

/// Like [`try_build`], but never fails: a document that cannot be built is
/// replaced by [`MapDocument::fallback`].
#[must_use]
pub fn build(
    esb: &Collection<LocationRecord>,
    scraper: &Collection<LocationRecord>,
    matches: &Collection<MatchRecord>,
) -> MapDocument {
    match try_build(esb, scraper, matches) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(error = %e, "map build failed; using fallback map");
            MapDocument::fallback()
        }
    }
}
