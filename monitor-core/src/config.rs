use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Client configuration, loaded from a JSON file in the user config
/// directory. Missing or unparseable files fall back to the defaults,
/// which are then written back so the file exists for editing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashConfig {
    /// Origin of the monitoring service's HTTP API.
    pub base_url: String,
    pub page_size: u32,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            page_size: 12,
            refresh_interval_secs: 60,
            request_timeout_secs: 10,
        }
    }
}

impl DashConfig {
    pub fn config_file_path() -> Result<PathBuf, std::io::Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no user config directory")
        })?;
        let app_dir = config_dir.join("keyword-monitor");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("config.json"))
    }

    pub fn load() -> Self {
        match Self::load_from_file() {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "failed to load config, using defaults");
                let default_config = Self::default();
                if let Err(save_err) = default_config.save() {
                    warn!(error = %save_err, "failed to save default config");
                }
                default_config
            }
        }
    }

    fn load_from_file() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::config_file_path()?;
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::config_file_path()?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
