//! Site configuration loading and data folder resolution
//!
//! A site configuration names the score key, the titles shown by a front-end
//! and, optionally, a custom level table. It lives in a TOML file:
//!
//! ```toml
//! site_key = "data-units"
//! title = "Data Units"
//!
//! [scoring]
//! points_per_correct = 1
//!
//! [[scoring.custom_levels]]
//! emoji = "🥚"
//! title = "Byte Beginner"
//! description = "Just cracked into the world of storage!"
//! min_points = 0
//! min_accuracy = 0
//! ```
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `DUQ_CONFIG` environment variable
//! 3. `<config dir>/duq/config.toml`
//! 4. Built-in "data-units" site (fallback)
//!
//! Only an explicitly requested file is allowed to fail loading; anything
//! else missing or broken logs a warning and falls back to the built-in site.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::score::LevelTier;
use crate::storage::validate_key;
use crate::{Error, Result};

/// Environment variable naming the site config file
pub const CONFIG_ENV_VAR: &str = "DUQ_CONFIG";

/// Environment variable naming the score data folder
pub const DATA_FOLDER_ENV_VAR: &str = "DUQ_DATA_FOLDER";

/// Application folder name under the platform config/data dirs
const APP_DIR_NAME: &str = "duq";

/// Site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Unique site identifier for score tracking
    pub site_key: String,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    #[serde(default = "default_icon")]
    pub icon: String,

    /// Folder for persisted scores (optional)
    ///
    /// If not specified, will attempt command line → environment → OS default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_folder: Option<PathBuf>,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_points_per_correct")]
    pub points_per_correct: u32,

    /// Custom level system (optional, falls back to the duck levels)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_levels: Option<Vec<LevelTier>>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_correct: default_points_per_correct(),
            custom_levels: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_title() -> String {
    "Data Units".to_string()
}

fn default_icon() -> String {
    "🦆".to_string()
}

fn default_points_per_correct() -> u32 {
    1
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl SiteConfig {
    /// Built-in data units practice site
    pub fn data_units() -> Self {
        Self {
            site_key: "data-units".to_string(),
            title: default_title(),
            subtitle: "Master the conversion of data units & file sizes".to_string(),
            icon: default_icon(),
            data_folder: None,
            scoring: ScoringConfig {
                points_per_correct: default_points_per_correct(),
                custom_levels: Some(data_units_levels()),
            },
            logging: LoggingConfig::default(),
        }
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(format!("Failed to encode config: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        validate_key(&self.site_key)
            .map_err(|_| Error::Config(format!("Invalid site_key: {:?}", self.site_key)))?;

        if self.scoring.points_per_correct == 0 {
            return Err(Error::Config("points_per_correct must be at least 1".to_string()));
        }

        if let Some(levels) = &self.scoring.custom_levels {
            for tier in levels {
                if !(0.0..=100.0).contains(&tier.min_accuracy) {
                    return Err(Error::Config(format!(
                        "Level '{}' has min_accuracy {} outside 0-100",
                        tier.title, tier.min_accuracy
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::data_units()
    }
}

/// Level table of the data units site
pub fn data_units_levels() -> Vec<LevelTier> {
    vec![
        LevelTier::new("🥚", "Byte Beginner", "Just cracked into the world of storage!", 0, 0.0),
        LevelTier::new("🐣", "Kilobyte Chick", "Taking your first waddle through file sizes!", 5, 0.0),
        LevelTier::new("🐤", "Megabyte Mallard", "Your storage calculations are really taking flight!", 12, 60.0),
        LevelTier::new("🦆", "Gigabyte Goose", "Swimming smoothly through unit conversions!", 25, 70.0),
        LevelTier::new("🦆✨", "Terabyte Teal", "Soaring through storage with byte-sized brilliance!", 50, 80.0),
        LevelTier::new(
            "🪿👑",
            "Petabyte Pond Emperor",
            "The legendary storage sage - no file size can ruffle your feathers!",
            75,
            90.0,
        ),
    ]
}

/// Platform default config file path (`~/.config/duq/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// Platform default score folder (`~/.local/share/duq` on Linux)
pub fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./duq_data"))
}

/// Load the site configuration following the resolution priority
pub fn load_site_config(cli_arg: Option<&Path>) -> Result<SiteConfig> {
    // Priority 1: Command-line argument, errors are the caller's problem
    if let Some(path) = cli_arg {
        info!("Loading site config from {}", path.display());
        return SiteConfig::load(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        match SiteConfig::load(&path) {
            Ok(config) => {
                info!("Loaded site config from {} ({})", path.display(), CONFIG_ENV_VAR);
                return Ok(config);
            }
            Err(e) => warn!(
                "Ignoring {}={} ({}), using defaults",
                CONFIG_ENV_VAR,
                path.display(),
                e
            ),
        }
    }

    // Priority 3: Platform config file
    if let Some(path) = default_config_path().filter(|p| p.exists()) {
        match SiteConfig::load(&path) {
            Ok(config) => {
                info!("Loaded site config from {}", path.display());
                return Ok(config);
            }
            Err(e) => warn!("Ignoring {} ({}), using defaults", path.display(), e),
        }
    }

    // Priority 4: Built-in site
    Ok(SiteConfig::data_units())
}

/// Folder for persisted scores
///
/// 1. Command-line argument
/// 2. `DUQ_DATA_FOLDER` environment variable
/// 3. `data_folder` in the site config
/// 4. OS-dependent default
pub fn resolve_data_folder(cli_arg: Option<&Path>, config: &SiteConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(DATA_FOLDER_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.data_folder {
        return path.clone();
    }

    default_data_folder()
}
