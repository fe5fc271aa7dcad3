use crate::collection::{Feature, LngLat, PointCollection};

/// Marker selection for one page load. Zone and coordinate modes are
/// mutually exclusive; a present zone always wins.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureFilter {
    All,
    Zone(String),
    Coordinate(LngLat),
}

impl FeatureFilter {
    /// Builds the filter from the page query. An empty `zona` counts as
    /// absent; the coordinate mode needs both ordinates.
    pub fn from_parts(zona: Option<&str>, longitude: Option<f64>, latitude: Option<f64>) -> Self {
        if let Some(zona) = zona.filter(|z| !z.is_empty()) {
            return FeatureFilter::Zone(zona.to_string());
        }
        match (longitude, latitude) {
            (Some(lng), Some(lat)) => FeatureFilter::Coordinate(LngLat::new(lng, lat)),
            _ => FeatureFilter::All,
        }
    }

    pub fn matches(&self, feature: &Feature) -> bool {
        match self {
            FeatureFilter::All => true,
            FeatureFilter::Zone(zona) => {
                feature.properties.zona.to_lowercase() == zona.to_lowercase()
            }
            // Exact equality, not proximity: the query addresses one stored
            // point. Only Point geometries can match.
            FeatureFilter::Coordinate(at) => feature
                .point_coordinates()
                .is_some_and(|p| p.lng == at.lng && p.lat == at.lat),
        }
    }
}

impl PointCollection {
    /// Drops every feature the filter rejects, keeping order. The collection
    /// later serializes with exactly the surviving features.
    pub fn retain_matching(&mut self, filter: &FeatureFilter) {
        self.features.retain(|feature| filter.matches(feature));
    }
}
