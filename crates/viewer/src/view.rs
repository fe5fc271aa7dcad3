use geodata::{LngLat, PointCollection};
use serde_json::{Value, json};
use tracing::debug;

use crate::card::informative_card;
use crate::query::ViewerQuery;

pub const DEFAULT_CENTER: LngLat = LngLat {
    lng: -72.497555,
    lat: 7.886069,
};
pub const DEFAULT_ZOOM: f64 = 12.0;
/// Camera target when a marker is clicked.
pub const FLY_TO_ZOOM: f64 = 12.0;
/// Southwest and northeast corners the camera may not leave.
pub const MAX_BOUNDS: [LngLat; 2] = [
    LngLat {
        lng: -72.792778,
        lat: 7.745556,
    },
    LngLat {
        lng: -71.4,
        lat: 8.283889,
    },
];

/// Initial camera state for one page load.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: LngLat,
    pub zoom: f64,
}

impl MapView {
    /// Each center axis falls back to the default independently; zoom
    /// likewise.
    pub fn from_query(query: &ViewerQuery) -> Self {
        Self {
            center: LngLat::new(
                query.longitude().unwrap_or(DEFAULT_CENTER.lng),
                query.latitude().unwrap_or(DEFAULT_CENTER.lat),
            ),
            zoom: query.zoom().unwrap_or(DEFAULT_ZOOM),
        }
    }
}

/// CSS id for a marker element, from the feature's `type` property.
pub fn marker_css_id(kind: &str) -> &'static str {
    match kind {
        "Mina" => "minas",
        "Oficina" => "oficina",
        _ => "patios",
    }
}

/// One rendered marker: position, styling id, floating label and the popup
/// fragment shown on click.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LngLat,
    pub css_id: &'static str,
    pub name: String,
    pub popup_html: String,
}

impl Marker {
    pub fn to_json(&self) -> Value {
        json!({
            "position": self.position.to_json(),
            "cssId": self.css_id,
            "name": self.name,
            "popupHtml": self.popup_html,
        })
    }
}

/// Builds one marker per Point feature, in collection order. Non-point
/// geometries stay in the layer data but get no marker.
pub fn build_markers(collection: &PointCollection) -> Vec<Marker> {
    let mut markers = Vec::with_capacity(collection.features.len());
    for feature in &collection.features {
        let Some(position) = feature.point_coordinates() else {
            debug!(
                "feature {} has no point geometry, skipping marker",
                feature.properties.name
            );
            continue;
        };
        let properties = &feature.properties;
        markers.push(Marker {
            position,
            css_id: marker_css_id(&properties.kind),
            name: properties.name.clone(),
            popup_html: informative_card(
                &properties.name,
                &properties.description,
                properties.image.as_deref(),
            ),
        });
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_CENTER, MapView, Marker, build_markers, marker_css_id};
    use crate::query::ViewerQuery;
    use geodata::{Feature, FeatureProperties, Geometry, LngLat, PointCollection};

    #[test]
    fn view_defaults_without_query() {
        let view = MapView::from_query(&ViewerQuery::default());
        assert_eq!(view.center, DEFAULT_CENTER);
        assert_eq!(view.zoom, 12.0);
    }

    #[test]
    fn view_takes_each_axis_independently() {
        let query = ViewerQuery {
            longitud: Some("-72.6".to_string()),
            latitud: Some("junk".to_string()),
            zoom: Some("14".to_string()),
            ..ViewerQuery::default()
        };
        let view = MapView::from_query(&query);
        assert_eq!(view.center, LngLat::new(-72.6, DEFAULT_CENTER.lat));
        assert_eq!(view.zoom, 14.0);
    }

    #[test]
    fn marker_type_lookup_has_a_default() {
        assert_eq!(marker_css_id("Mina"), "minas");
        assert_eq!(marker_css_id("Oficina"), "oficina");
        assert_eq!(marker_css_id("Patio"), "patios");
        assert_eq!(marker_css_id("mina"), "patios");
    }

    #[test]
    fn markers_come_from_point_features_only() {
        let collection = PointCollection::new(
            None,
            vec![
                Feature::new(
                    Geometry::point(-72.5, 7.88),
                    FeatureProperties::new("Mina El Diamante", "Frente principal", "Mina", "Norte"),
                ),
                Feature::new(
                    Geometry::LineString(vec![
                        LngLat::new(-72.5, 7.88),
                        LngLat::new(-72.4, 7.9),
                    ]),
                    FeatureProperties::new("Via de acceso", "Carretera interna", "Via", "Norte"),
                ),
            ],
        );
        let markers = build_markers(&collection);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].css_id, "minas");
        assert_eq!(markers[0].position, LngLat::new(-72.5, 7.88));
        assert!(markers[0].popup_html.contains("Mina El Diamante"));
    }

    #[test]
    fn marker_popup_is_escaped() {
        let collection = PointCollection::new(
            None,
            vec![Feature::new(
                Geometry::point(-72.5, 7.88),
                FeatureProperties::new("<b>Mina</b>", "desc", "Mina", "Norte"),
            )],
        );
        let markers = build_markers(&collection);
        assert!(markers[0].popup_html.contains("&lt;b&gt;Mina&lt;/b&gt;"));
    }

    #[test]
    fn marker_serializes_for_the_page_script() {
        let marker = Marker {
            position: LngLat::new(-72.5, 7.88),
            css_id: "minas",
            name: "Mina El Diamante".to_string(),
            popup_html: "<div/>".to_string(),
        };
        let value = marker.to_json();
        assert_eq!(value["position"], serde_json::json!([-72.5, 7.88]));
        assert_eq!(value["cssId"], "minas");
    }
}
