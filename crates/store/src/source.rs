//! Point document access.
//!
//! `PointSource` is the seam between HTTP handlers and storage: the server
//! receives one by injection, so tests and demos can substitute an
//! in-memory source for the MongoDB-backed one.

use std::future::Future;
use std::pin::Pin;

use geodata::PointCollection;
use mongodb::bson::doc;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::mongo::MongoConnector;

/// The fixed collection every point document lives in.
pub const POINTS_COLLECTION: &str = "points";

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read access to the stored point documents.
///
/// Implementations must be `Send + Sync` for use across async tasks.
/// Methods return boxed futures for dyn-compatibility.
pub trait PointSource: Send + Sync {
    /// Fetch every point document, validated into typed collections.
    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<PointCollection>, StoreError>>;
}

/// Production source. Every call opens its own request-scoped connector,
/// runs one unfiltered `find` against `points`, and closes the connector
/// whether or not the query succeeded. No pooling, no retry, no timeout.
pub struct MongoPointSource {
    config: StoreConfig,
}

impl MongoPointSource {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }
}

impl PointSource for MongoPointSource {
    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<PointCollection>, StoreError>> {
        Box::pin(async move {
            let mut connector = MongoConnector::new(self.config.clone());
            connector.connect().await;
            let outcome = connector.find_documents(POINTS_COLLECTION, doc! {}).await;
            connector.close().await;

            outcome?
                .into_iter()
                .map(|document| {
                    let value = serde_json::to_value(&document).map_err(|err| {
                        StoreError::query_with_source("document is not representable as JSON", err)
                    })?;
                    PointCollection::from_value(value).map_err(StoreError::Decode)
                })
                .collect()
        })
    }
}

/// Fixed in-memory source.
pub struct MemoryPointSource {
    documents: Vec<PointCollection>,
}

impl MemoryPointSource {
    pub fn new(documents: Vec<PointCollection>) -> Self {
        Self { documents }
    }
}

impl PointSource for MemoryPointSource {
    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<PointCollection>, StoreError>> {
        Box::pin(async move { Ok(self.documents.clone()) })
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryPointSource, PointSource};
    use geodata::{Feature, FeatureProperties, Geometry, PointCollection};

    fn sample_collection() -> PointCollection {
        PointCollection::new(
            Some("66b2a4f01c9d440000a1b2c3".to_string()),
            vec![Feature::new(
                Geometry::point(-72.5, 7.88),
                FeatureProperties::new("Mina El Diamante", "Frente principal", "Mina", "Norte"),
            )],
        )
    }

    #[tokio::test]
    async fn memory_source_returns_its_documents() {
        let source = MemoryPointSource::new(vec![sample_collection()]);
        let documents = source.fetch_all().await.expect("fetch");
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].features[0].properties.name, "Mina El Diamante");
    }

    #[tokio::test]
    async fn sources_are_usable_behind_a_trait_object() {
        let source: Box<dyn PointSource> = Box::new(MemoryPointSource::new(vec![]));
        let documents = source.fetch_all().await.expect("fetch");
        assert!(documents.is_empty());
    }
}
