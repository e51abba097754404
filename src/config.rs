/// Application configuration
///
/// Every value has a default, so a catalog folder needs no config file at all.
/// When present, `catalog.json` in the catalog root (or in the user's config
/// directory) overrides individual keys:
///
/// ```json
/// { "photo_folders": ["FOTOS1", "FOTOS2"], "batch_size": 24 }
/// ```
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CatalogError, Result};

/// Name of the optional configuration file
pub const CONFIG_FILE: &str = "catalog.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Product table, relative to the catalog root
    pub catalog_file: PathBuf,
    /// Folders searched in order for `<code>.<image_extension>`
    pub photo_folders: Vec<PathBuf>,
    /// Extension of product photos (without the dot)
    pub image_extension: String,
    /// Image shown when no candidate photo exists
    pub fallback_image: PathBuf,
    /// Quiet period before a search runs
    pub debounce_ms: u64,
    /// Cards rendered per batch before yielding to the event loop
    pub batch_size: usize,
    /// Window width (logical pixels) at or below which the sidebar collapses
    pub narrow_width: f32,
    /// Price formatting
    pub locale: NumberLocale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_file: PathBuf::from("PRODUCTOS.csv"),
            photo_folders: (1..=6).map(|i| PathBuf::from(format!("FOTOS{}", i))).collect(),
            image_extension: "jpg".to_string(),
            fallback_image: PathBuf::from("noimg.jpg"),
            debounce_ms: 300,
            batch_size: 12,
            narrow_width: 768.0,
            locale: NumberLocale::default(),
        }
    }
}

/// Separators and currency symbol used for prices
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NumberLocale {
    pub currency_symbol: String,
    pub grouping_separator: char,
    pub decimal_separator: char,
}

impl Default for NumberLocale {
    /// es-AR: `$ 1.234,5`
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            grouping_separator: '.',
            decimal_separator: ',',
        }
    }
}

impl Config {
    /// Load the configuration for a catalog rooted at `root`.
    ///
    /// Looks for `catalog.json` in the root first, then in the user config
    /// directory (`~/.config/product-catalog/` on Linux). Returns the
    /// defaults when neither exists.
    pub fn load(root: &Path) -> Result<Self> {
        let candidates = [Some(root.join(CONFIG_FILE)), Self::user_config_path()];

        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                let config = Self::from_file(&path)?;
                log::info!("Loaded configuration from {}", path.display());
                return Ok(config);
            }
        }

        log::debug!("No {} found, using defaults", CONFIG_FILE);
        Ok(Self::default())
    }

    /// Parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| CatalogError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| CatalogError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn user_config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("product-catalog");
        path.push(CONFIG_FILE);
        Some(path)
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Batch size, never zero
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}
