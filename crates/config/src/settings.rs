// Application settings
// Loaded from ~/.config/vatcheck/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Company profile, shown in report headers
    pub company_name: String,
    pub representative: String,
    pub accountant_name: String,

    // Folders
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,

    /// Optional TOML file overriding the reconciliation rules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recon_config: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            company_name: "내 쇼핑몰".to_string(),
            representative: "홍길동".to_string(),
            accountant_name: "세무사사무소".to_string(),
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            recon_config: None,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vatcheck");
        config_dir.join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file gives defaults; keys absent
    /// from the file keep their default values.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => {
                    log::debug!("loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON, ignoring lines that start with `//`.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    /// Save current settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }
}
