use crate::search::matcher::SearchMatcher;
use crate::search::sorter::RecordSorter;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub search: SearchConfig,
    pub history: HistoryConfig,
    pub display: DisplayConfig,
    pub contacts: ContactConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Field holding each record's unique identity
    pub id_field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Matcher applied to every filter: exact, partial, case_insensitive, pattern
    pub matcher: SearchMatcher,

    /// Sorter used when a sort field is selected: alphabetic, numeric, chronological
    pub sorter: RecordSorter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum undoable commands kept (0 = unbounded)
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Columns shown by the shell, in order; empty shows every field
    pub columns: Vec<String>,

    /// Maximum rows printed by `show`
    pub max_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub phone_field: String,
    pub email_field: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            max_rows: 200,
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            phone_field: "phone".to_string(),
            email_field: "email".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("vendor-desk").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Vendor Desk Configuration File
# Location: ~/.config/vendor-desk/config.toml (Linux/macOS)
#           %APPDATA%\vendor-desk\config.toml (Windows)

[store]
# Field that uniquely identifies each record
id_field = "id"

[search]
# How filter terms match field values:
#   "exact"            - exact string equality
#   "partial"          - case-insensitive substring
#   "case_insensitive" - case-insensitive equality
#   "pattern"          - case-insensitive regular expression
matcher = "partial"

# How the sort field is compared: "alphabetic", "numeric", "chronological"
sorter = "alphabetic"

[history]
# Undoable commands kept in memory (0 = unbounded)
max_depth = 100

[display]
# Columns shown by `show`, in order (empty = all fields)
columns = []

# Maximum rows printed at once
max_rows = 200

[contacts]
# Fields read when building bulk message recipients
phone_field = "phone"
email_field = "email"
"#
        .to_string()
    }
}
