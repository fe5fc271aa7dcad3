use futures_util::TryStreamExt;
use mongodb::bson::Document;
use mongodb::{Client, Database};
use tracing::{debug, error};

use crate::config::StoreConfig;
use crate::error::StoreError;

/// Thin lifecycle wrapper over one `mongodb::Client`: connect, query, close.
///
/// Connect failures are logged and swallowed; the connector simply stays
/// disconnected and the next query reports `NotConnected`. Query failures
/// are logged and re-raised.
pub struct MongoConnector {
    config: StoreConfig,
    client: Option<Client>,
    db: Option<Database>,
}

impl MongoConnector {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            client: None,
            db: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.db.is_some()
    }

    pub async fn connect(&mut self) {
        match Client::with_uri_str(&self.config.url).await {
            Ok(client) => {
                self.db = Some(client.database(&self.config.db_name));
                self.client = Some(client);
                debug!(
                    "connected to database {} at {}",
                    self.config.db_name, self.config.url
                );
            }
            Err(err) => error!("database connection failed: {err}"),
        }
    }

    /// Runs `find` on the named collection and drains the cursor.
    pub async fn find_documents(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<Document>, StoreError> {
        let Some(db) = &self.db else {
            return Err(StoreError::NotConnected);
        };

        let cursor = db
            .collection::<Document>(collection)
            .find(filter)
            .await
            .map_err(|err| {
                error!("query on collection {collection} failed: {err}");
                StoreError::query_with_source(format!("query on collection {collection} failed"), err)
            })?;
        cursor.try_collect().await.map_err(|err| {
            error!("cursor drain on collection {collection} failed: {err}");
            StoreError::query_with_source(
                format!("cursor drain on collection {collection} failed"),
                err,
            )
        })
    }

    /// Shuts the client down. Safe to call when never connected.
    pub async fn close(&mut self) {
        self.db = None;
        if let Some(client) = self.client.take() {
            client.shutdown().await;
            debug!("database connection closed");
        }
    }
}
