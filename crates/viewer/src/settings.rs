use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_MAPBOX_TOKEN: &str = "token";

/// Viewer runtime configuration: where the points API lives, the Mapbox
/// access token, and whether bootstrap failures render a visible banner
/// instead of a blank page.
///
/// The TOML keys are camelCase on purpose. The settings file is produced
/// from `settings.example.toml` by `envsub`, whose plain substring
/// substitution would mangle any key containing the placeholder `token`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "urlConnection")]
    pub api_base_url: String,
    #[serde(rename = "mapBoxToken")]
    pub mapbox_token: String,
    #[serde(rename = "showErrorBanner")]
    pub show_error_banner: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            mapbox_token: DEFAULT_MAPBOX_TOKEN.to_string(),
            show_error_banner: false,
        }
    }
}

impl Settings {
    /// Reads `URL_CONNECTION`, `MAPBOX` and `VIEWER_ERROR_BANNER`, falling
    /// back to the defaults when unset.
    pub fn from_env() -> Self {
        let mut settings = Settings::default();
        if let Ok(url) = env::var("URL_CONNECTION") {
            settings.api_base_url = url;
        }
        if let Ok(token) = env::var("MAPBOX") {
            settings.mapbox_token = token;
        }
        settings.show_error_banner = matches!(
            env::var("VIEWER_ERROR_BANNER").as_deref(),
            Ok("1") | Ok("true")
        );
        settings
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Settings file first (`VIEWER_SETTINGS` path or `settings.toml`),
    /// then the environment. A malformed file is skipped with a warning,
    /// not fatal.
    pub fn load() -> Self {
        let path = env::var("VIEWER_SETTINGS").unwrap_or_else(|_| "settings.toml".to_string());
        if Path::new(&path).exists() {
            match fs::read_to_string(&path) {
                Ok(raw) => match Self::from_toml_str(&raw) {
                    Ok(settings) => {
                        debug!("viewer settings loaded from {path}");
                        return settings;
                    }
                    Err(err) => warn!("settings file {path} is invalid: {err}"),
                },
                Err(err) => warn!("settings file {path} is unreadable: {err}"),
            }
        }
        Self::from_env()
    }
}
