use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::DEFAULT_ENDPOINT;
use crate::error::{GeolensError, Result};
use crate::raster::overlay::OverlayOptions;
use crate::upload::session::UploadConfig;
use crate::viewport::ViewportConfig;

/// Application settings, loadable from TOML. Missing keys take defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// URL the analysis request is posted to.
    pub endpoint: String,
    pub overlay: OverlayOptions,
    pub viewport: ViewportConfig,
    pub upload: UploadConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            overlay: OverlayOptions::default(),
            viewport: ViewportConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| GeolensError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GeolensError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(GeolensError::Config(format!(
                "endpoint {:?} is not an http(s) URL",
                self.endpoint
            )));
        }
        self.overlay
            .validate()
            .map_err(|e| GeolensError::Config(e.to_string()))?;
        if self.viewport.padding_px < 0.0 {
            return Err(GeolensError::Config("viewport.padding_px is negative".into()));
        }
        self.upload.validate()
    }
}
