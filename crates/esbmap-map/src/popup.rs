//! Popup and tooltip text. Every interpolated value is HTML-escaped since
//! Leaflet injects popup content as markup.

use std::fmt::Display;

use quick_xml::escape::escape;

pub(crate) const PLACEHOLDER: &str = "N/A";

fn text(value: Option<&str>) -> String {
    escape(value.unwrap_or(PLACEHOLDER)).into_owned()
}

fn metric(value: Option<f32>, precision: usize) -> String {
    value.map_or_else(
        || PLACEHOLDER.to_string(),
        |v| format!("{v:.precision$}"),
    )
}

pub(crate) fn point_popup(title: &str, brand: Option<&str>, address: Option<&str>) -> String {
    format!(
        "<b>{title}</b><br>Brand: {}<br>Address: {}",
        text(brand),
        text(address)
    )
}

pub(crate) fn point_tooltip(title: &str, brand: Option<&str>) -> String {
    format!("{title}: {}", text(brand))
}

pub(crate) fn edge_popup(
    confidence: Option<f32>,
    distance_m: Option<f32>,
    brand_esb: Option<&str>,
    brand_pulau: Option<&str>,
) -> String {
    format!(
        "<b>Match</b><br>Confidence: {}<br>Distance: {} m<br>ESB: {}<br>Scraper: {}",
        metric(confidence, 3),
        metric(distance_m, 1),
        text(brand_esb),
        text(brand_pulau)
    )
}

pub(crate) fn endpoint_popup(title: impl Display, brand: Option<&str>) -> String {
    format!("<b>{title}</b><br>{}", text(brand))
}
