use geodata::GeoJsonError;

/// Error type for store operations.
#[derive(Debug)]
pub enum StoreError {
    /// A query was attempted before `connect` established a handle.
    NotConnected,
    /// The driver rejected a query or the cursor failed mid-drain.
    Query {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// A stored document does not satisfy the point-collection shape.
    Decode(GeoJsonError),
}

impl StoreError {
    pub fn query(message: impl Into<String>) -> Self {
        StoreError::Query {
            message: message.into(),
            source: None,
        }
    }

    pub fn query_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StoreError::Query {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotConnected => write!(f, "database connection is not established"),
            StoreError::Query { message, .. } => write!(f, "{message}"),
            StoreError::Decode(err) => write!(f, "stored document failed validation: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::NotConnected => None,
            StoreError::Query { source, .. } => source.as_ref().map(|e| e.as_ref() as _),
            StoreError::Decode(err) => Some(err),
        }
    }
}
