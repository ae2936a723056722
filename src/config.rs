//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::{fs, path::Path};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Overrides the environment's site URL when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Whether usage telemetry may be sent.
    #[serde(default = "default_telemetry")]
    pub telemetry: bool,

    /// Query string of the last analysis, restored on the next `analyze` run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_analysis: Option<String>,
}

fn default_telemetry() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            telemetry: default_telemetry(),
            last_analysis: None,
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the configuration, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load_from_file(path).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable config {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Forgets the saved analysis, keeping the rest of the configuration.
    pub fn clear_last_analysis(path: &Path) -> Result<(), std::io::Error> {
        if !path.exists() {
            return Ok(());
        }
        let mut config = Self::load_from_file(path)?;
        config.last_analysis = None;
        config.save(path)
    }
}

/// Location of the configuration file: `~/.beer-analytics/config.json`.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home_path = home::home_dir().ok_or(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "Home directory not found",
    ))?;
    Ok(home_path.join(".beer-analytics").join("config.json"))
}
