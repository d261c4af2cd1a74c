//! Renderer-neutral description of the map: base tiles, center, and the
//! three toggleable overlay layers.

use esbmap_core::GeoPoint;
use serde::Serialize;

use crate::center::FALLBACK_CENTER;

pub const DEFAULT_ZOOM: u8 = 10;
pub const POPUP_MAX_WIDTH: u32 = 300;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub name: &'static str,
    pub url: &'static str,
    pub attribution: &'static str,
}

pub const CARTODB_POSITRON: TileLayer = TileLayer {
    name: "CartoDB positron",
    url: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
    attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Esb,
    Scraper,
    Matches,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] = [LayerKind::Esb, LayerKind::Scraper, LayerKind::Matches];

    /// Label shown in the layer control.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            LayerKind::Esb => "ESB Data (Orange)",
            LayerKind::Scraper => "Scraper Data (Blue)",
            LayerKind::Matches => "Match (Green)",
        }
    }
}

/// Stroke and fill options, named after their Leaflet path options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Style {
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

/// Popup body. `html` is already escaped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleMarker {
    pub location: GeoPoint,
    pub radius: f32,
    pub style: Style,
    pub popup: Popup,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

/// A straight edge between two coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub locations: [GeoPoint; 2],
    pub style: Style,
    pub popup: Popup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    CircleMarker(CircleMarker),
    Polyline(Polyline),
}

/// One overlay. Clustered layers group nearby markers until zoomed in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub kind: LayerKind,
    pub name: &'static str,
    pub clustered: bool,
    /// Initially visible; the layer control can toggle it either way.
    pub show: bool,
    pub elements: Vec<Element>,
}

impl Layer {
    #[must_use]
    pub fn clustered(kind: LayerKind, elements: Vec<Element>) -> Self {
        Self {
            kind,
            name: kind.title(),
            clustered: true,
            show: true,
            elements,
        }
    }

    pub fn markers(&self) -> impl Iterator<Item = &CircleMarker> {
        self.elements.iter().filter_map(|e| match e {
            Element::CircleMarker(marker) => Some(marker),
            Element::Polyline(_) => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &Polyline> {
        self.elements.iter().filter_map(|e| match e {
            Element::Polyline(edge) => Some(edge),
            Element::CircleMarker(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapDocument {
    pub center: GeoPoint,
    pub zoom_start: u8,
    pub tiles: TileLayer,
    pub prefer_canvas: bool,
    pub layers: Vec<Layer>,
    pub layer_control: bool,
}

impl MapDocument {
    /// A document with the given overlays over the default base map.
    #[must_use]
    pub fn new(center: GeoPoint, layers: Vec<Layer>) -> Self {
        Self {
            center,
            zoom_start: DEFAULT_ZOOM,
            tiles: CARTODB_POSITRON,
            prefer_canvas: true,
            layers,
            layer_control: true,
        }
    }

    /// The minimal displayable document: fallback center, all three layers
    /// present and empty.
    #[must_use]
    pub fn fallback() -> Self {
        let layers = LayerKind::ALL
            .iter()
            .map(|&kind| Layer::clustered(kind, Vec::new()))
            .collect();
        Self::new(FALLBACK_CENTER, layers)
    }

    #[must_use]
    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find(|l| l.kind == kind)
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.layers.iter().map(|l| l.elements.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_has_three_empty_layers_at_fallback_center() {
        let doc = MapDocument::fallback();
        assert_eq!(doc.center, FALLBACK_CENTER);
        assert_eq!(doc.layers.len(), 3);
        assert_eq!(doc.element_count(), 0);
        assert!(doc.layer_control);
        for kind in LayerKind::ALL {
            assert!(doc.layer(kind).is_some_and(|l| l.show && l.clustered));
        }
    }

    #[test]
    fn element_serializes_with_type_tag() {
        let marker = Element::CircleMarker(CircleMarker {
            location: GeoPoint::new(-6.2, 106.8),
            radius: 4.0,
            style: Style {
                color: "orange",
                fill_color: None,
                fill_opacity: None,
                opacity: None,
                weight: None,
            },
            popup: Popup {
                html: "<b>ESB</b>".to_string(),
                max_width: None,
            },
            tooltip: None,
        });
        let json = serde_json::to_value(&marker).unwrap();
        assert_eq!(json["type"], "circle_marker");
        assert_eq!(json["location"][0], -6.2);
        assert!(json["style"].get("fill_color").is_none());
        assert!(json.get("tooltip").is_none());
    }

    #[test]
    fn layer_kind_titles_are_distinct() {
        let titles: std::collections::HashSet<_> =
            LayerKind::ALL.iter().map(|k| k.title()).collect();
        assert_eq!(titles.len(), 3);
    }
}
