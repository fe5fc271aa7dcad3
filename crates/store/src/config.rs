use std::env;

pub const DEFAULT_URL: &str = "mongodb://localhost:27017";
pub const DEFAULT_DB_NAME: &str = "miBaseDeDatos";

/// Connection settings for the point database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub db_name: String,
}

impl StoreConfig {
    pub fn new(url: &str, db_name: &str) -> Self {
        Self {
            url: url.to_string(),
            db_name: db_name.to_string(),
        }
    }

    /// Reads `MONGODBURL` and `MONGODBNAME`, falling back to the local
    /// defaults when unset.
    pub fn from_env() -> Self {
        Self {
            url: env::var("MONGODBURL").unwrap_or_else(|_| DEFAULT_URL.to_string()),
            db_name: env::var("MONGODBNAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string()),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL, DEFAULT_DB_NAME)
    }
}
