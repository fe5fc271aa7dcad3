use geodata::PointCollection;
use serde_json::{Value, json};

use crate::card::escape_html;
use crate::settings::Settings;
use crate::view::{FLY_TO_ZOOM, MAX_BOUNDS, MapView, Marker};

const PAGE_HEAD: &str = r##"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Mapa de Puntos</title>
  <link rel="stylesheet" href="https://api.mapbox.com/mapbox-gl-js/v2.15.0/mapbox-gl.css" />
  <style>
    html, body { height: 100%; margin: 0; padding: 0; }
    #map { height: 100%; width: 100%; }
    .custom-marker { cursor: pointer; width: 24px; height: 24px; background-size: cover; }
    .floating-name {
      position: absolute;
      bottom: 26px;
      left: 50%;
      transform: translateX(-50%);
      white-space: nowrap;
      font: 12px/1.4 sans-serif;
      background: rgba(255, 255, 255, 0.85);
      border-radius: 3px;
      padding: 1px 4px;
      pointer-events: none;
    }
    #minas { background-color: #8d6e63; border-radius: 50%; }
    #oficina { background-color: #1565c0; border-radius: 50%; }
    #patios { background-color: #2e7d32; border-radius: 50%; }
    .card-img { width: 100%; border-radius: 4px; }
    .card-title { margin: 0 0 4px; font: bold 16px/1.3 sans-serif; }
    .card-text { margin: 0; font: 13px/1.4 sans-serif; }
    .error-banner {
      position: absolute;
      top: 12px;
      left: 50%;
      transform: translateX(-50%);
      z-index: 10;
      background: #b71c1c;
      color: #fff;
      padding: 8px 16px;
      border-radius: 4px;
      font: 14px/1.4 sans-serif;
    }
  </style>
</head>
<body>
  <div id="map"></div>
"##;

const SCRIPT_INCLUDES: &str = r##"  <script src="https://api.mapbox.com/mapbox-gl-js/v2.15.0/mapbox-gl.js"></script>
  <script src="https://unpkg.com/mapbox-gl-animated-popup@2/dist/mapbox-gl-animated-popup.min.js"></script>
"##;

// Static widget glue. Every data decision is made server-side and arrives
// through PAGE_DATA.
const MAP_SCRIPT: &str = r##"
mapboxgl.accessToken = PAGE_DATA.accessToken;

const map = new mapboxgl.Map({
  container: "map",
  center: PAGE_DATA.center,
  zoom: PAGE_DATA.zoom,
  maxBounds: PAGE_DATA.maxBounds,
});

const addPointsLayer = () => {
  const source = map.getSource("points");
  if (!source) {
    map.addSource("points", { type: "geojson", data: PAGE_DATA.collection });
    map.addLayer({
      id: "points-layer",
      type: "circle",
      source: "points",
      paint: {
        "circle-radius": 6,
        "circle-color": "#ff0000",
      },
    });
  } else {
    source.setData(PAGE_DATA.collection);
  }
};

const addMarker = (marker) => {
  const popup = new AnimatedPopup({
    offset: 25,
    openingAnimation: { duration: 1000, easing: "easeOutExpo", transform: "scale" },
    closingAnimation: { duration: 300, easing: "easeOutBack", transform: "opacity" },
  }).setHTML('<div style="overflow: auto;margin-top: 6%;">' + marker.popupHtml + '</div>');

  const el = document.createElement("div");
  el.className = "custom-marker";
  el.id = marker.cssId;

  const floatingName = document.createElement("div");
  floatingName.className = "floating-name";
  floatingName.innerText = marker.name;
  el.appendChild(floatingName);

  new mapboxgl.Marker(el)
    .setLngLat(marker.position)
    .setPopup(popup)
    .addTo(map)
    .getElement()
    .addEventListener("click", () => {
      map.flyTo({ center: marker.position, zoom: PAGE_DATA.flyToZoom, essential: true });
    });
};

map.on("load", () => {
  addPointsLayer();
  PAGE_DATA.markers.forEach(addMarker);
});
"##;

const PAGE_FOOT: &str = "</body>\n</html>\n";

/// Assembles the full map page: shell, script includes, the baked view
/// model, and the static widget script.
pub fn render(
    settings: &Settings,
    view: &MapView,
    collection: &PointCollection,
    markers: &[Marker],
) -> String {
    let boot = json!({
        "accessToken": settings.mapbox_token,
        "center": view.center.to_json(),
        "zoom": view.zoom,
        "maxBounds": [MAX_BOUNDS[0].to_json(), MAX_BOUNDS[1].to_json()],
        "flyToZoom": FLY_TO_ZOOM,
        "collection": collection.to_value(),
        "markers": markers.iter().map(Marker::to_json).collect::<Vec<_>>(),
    });

    let data = json_for_script(&boot);
    let mut page =
        String::with_capacity(PAGE_HEAD.len() + MAP_SCRIPT.len() + data.len() + 512);
    page.push_str(PAGE_HEAD);
    page.push_str(SCRIPT_INCLUDES);
    page.push_str("  <script>\nconst PAGE_DATA = ");
    page.push_str(&data);
    page.push_str(";\n  </script>\n  <script>");
    page.push_str(MAP_SCRIPT);
    page.push_str("  </script>\n");
    page.push_str(PAGE_FOOT);
    page
}

/// The shell with no widget script at all: what a failed bootstrap serves
/// when the error banner is disabled.
pub fn empty_shell() -> String {
    format!("{PAGE_HEAD}{PAGE_FOOT}")
}

/// The shell plus a visible banner, for deployments that opt into it.
pub fn error_banner_shell(message: &str) -> String {
    let mut page = String::with_capacity(PAGE_HEAD.len() + PAGE_FOOT.len() + 128);
    page.push_str(PAGE_HEAD);
    page.push_str("  <div class=\"error-banner\">");
    page.push_str(&escape_html(message));
    page.push_str("</div>\n");
    page.push_str(PAGE_FOOT);
    page
}

/// Serializes a value for embedding inside a `<script>` block. `<` is
/// escaped so markup carried in strings cannot terminate the block early.
pub fn json_for_script(value: &Value) -> String {
    value.to_string().replace('<', "\\u003c")
}
