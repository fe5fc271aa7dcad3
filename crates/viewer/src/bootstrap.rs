use client::{ClientError, PointsClient};
use geodata::{FeatureFilter, GeoJsonError, PointCollection};
use serde_json::Value;
use tracing::info;

use crate::page;
use crate::query::ViewerQuery;
use crate::settings::Settings;
use crate::view::{MapView, build_markers};

/// Error type for the page bootstrap flow.
#[derive(Debug)]
pub enum BootstrapError {
    /// The backend answered with an empty collection.
    NoPointData,
    /// The fetched document is not a usable FeatureCollection.
    InvalidCollection(GeoJsonError),
    /// The backend call itself failed.
    Fetch(ClientError),
}

impl std::fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootstrapError::NoPointData => write!(f, "no point data returned by the API"),
            BootstrapError::InvalidCollection(err) => write!(f, "invalid point data: {err}"),
            BootstrapError::Fetch(err) => write!(f, "point fetch failed: {err}"),
        }
    }
}

impl std::error::Error for BootstrapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BootstrapError::NoPointData => None,
            BootstrapError::InvalidCollection(err) => Some(err),
            BootstrapError::Fetch(err) => Some(err),
        }
    }
}

/// One page load: fetch, validate, filter, render. Exactly one backend call
/// per invocation; every failure is raised to the caller, which decides
/// what shell to serve instead.
pub async fn render_map_page(
    points: &PointsClient,
    query: &ViewerQuery,
    settings: &Settings,
) -> Result<String, BootstrapError> {
    info!("fetching point collection");
    let document = points
        .get_points()
        .await
        .map_err(BootstrapError::Fetch)?
        .ok_or(BootstrapError::NoPointData)?;
    render_from_document(document, query, settings)
}

/// The synchronous tail of the flow, split out so it can run on any raw
/// document: validate, filter, compute the view, assemble the page.
pub fn render_from_document(
    document: Value,
    query: &ViewerQuery,
    settings: &Settings,
) -> Result<String, BootstrapError> {
    let mut collection =
        PointCollection::from_value(document).map_err(BootstrapError::InvalidCollection)?;

    let filter = FeatureFilter::from_parts(query.zona(), query.longitude(), query.latitude());
    collection.retain_matching(&filter);
    info!(
        "rendering {} features after filtering",
        collection.features.len()
    );

    let view = MapView::from_query(query);
    let markers = build_markers(&collection);
    Ok(page::render(settings, &view, &collection, &markers))
}
