use serde_json::Value;
use tracing::{debug, error};

use crate::http::{ClientError, HttpClient};

/// Client for the points API: one read endpoint, one document consumed.
#[derive(Debug, Clone)]
pub struct PointsClient {
    http: HttpClient,
}

impl PointsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: HttpClient::new(base_url),
        }
    }

    pub fn from_http(http: HttpClient) -> Self {
        Self { http }
    }

    /// Fetches the point documents and returns the first one, raw.
    /// `Ok(None)` means the collection is empty; callers must handle it.
    pub async fn get_points(&self) -> Result<Option<Value>, ClientError> {
        let documents: Vec<Value> = match self.http.get("/get/points").await {
            Ok(documents) => documents,
            Err(err) => {
                error!("fetching points failed: {err}");
                return Err(err);
            }
        };
        if documents.len() > 1 {
            debug!(
                "backend returned {} point documents, using the first",
                documents.len()
            );
        }
        Ok(documents.into_iter().next())
    }
}
