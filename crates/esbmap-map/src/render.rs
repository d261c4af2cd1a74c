//! Standalone Leaflet page for a [`MapDocument`].

use crate::document::MapDocument;

const DOCUMENT_PLACEHOLDER: &str = "__ESBMAP_DOCUMENT__";

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>ESB vs Scraper Map</title>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"></script>
  <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.4.1/dist/MarkerCluster.css" />
  <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.4.1/dist/MarkerCluster.Default.css" />
  <script src="https://unpkg.com/leaflet.markercluster@1.4.1/dist/leaflet.markercluster.js"></script>
  <style>
    html, body { height: 100%; margin: 0; }
    #map { position: absolute; inset: 0; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script id="esbmap-document" type="application/json">__ESBMAP_DOCUMENT__</script>
  <script>
    (function () {
      const doc = JSON.parse(document.getElementById("esbmap-document").textContent);
      if (!doc || !doc.center) { return; }

      const map = L.map("map", { preferCanvas: doc.prefer_canvas })
        .setView(doc.center, doc.zoom_start);
      L.tileLayer(doc.tiles.url, { attribution: doc.tiles.attribution }).addTo(map);

      const pathOptions = (style) => ({
        color: style.color,
        fillColor: style.fill_color,
        fillOpacity: style.fill_opacity,
        opacity: style.opacity,
        weight: style.weight,
      });

      const draw = (element) => {
        let shape;
        if (element.type === "circle_marker") {
          shape = L.circleMarker(element.location, { ...pathOptions(element.style), radius: element.radius });
          if (element.tooltip) { shape.bindTooltip(element.tooltip); }
        } else {
          shape = L.polyline(element.locations, pathOptions(element.style));
        }
        shape.bindPopup(element.popup.html, element.popup.max_width ? { maxWidth: element.popup.max_width } : {});
        return shape;
      };

      const overlays = {};
      for (const layer of doc.layers) {
        const group = layer.clustered ? L.markerClusterGroup() : L.featureGroup();
        layer.elements.forEach((element) => group.addLayer(draw(element)));
        if (layer.show) { group.addTo(map); }
        overlays[layer.name] = group;
      }
      if (doc.layer_control) { L.control.layers(null, overlays, { collapsed: false }).addTo(map); }
    })();
  </script>
</body>
</html>
"#;

/// Renders `document` as a self-contained HTML page.
///
/// The document is embedded as JSON inside a `<script type="application/json">`
/// block; every `<` is written as `\u003c` so no string value can close the
/// block early.
#[must_use]
pub fn render_html(document: &MapDocument) -> String {
    let json = serde_json::to_string(document).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to serialize map document");
        "null".to_string()
    });
    PAGE_TEMPLATE.replacen(DOCUMENT_PLACEHOLDER, &json.replace('<', "\\u003c"), 1)
}
