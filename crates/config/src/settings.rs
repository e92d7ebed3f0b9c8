// Application settings
// Loaded from ~/.config/pickrecon/settings.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File format for the missing-items export when none is given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// SQLite database file. None = `<data dir>/pickrecon/pickrecon.db`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Where exports land when no output path is given. None = working directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    pub format: ExportFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, same syntax as RUST_LOG. RUST_LOG wins when set.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { filter: "warn".to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub export: ExportSettings,
    pub logging: LoggingSettings,
}

const DEFAULT_FILE: &str = r#"# pickrecon settings

[storage]
# SQLite database holding reports and picks.
# database = "/var/lib/pickrecon/pickrecon.db"

[export]
# Directory for exports written without an explicit path.
# dir = "/srv/exports"
# Missing-items export format: "csv" or "xlsx"
format = "csv"

[logging]
# Overridden by RUST_LOG when set; -v switches to "debug".
filter = "warn"
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pickrecon")
            .join("settings.toml")
    }

    /// Default database location under the platform data directory
    pub fn default_database_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pickrecon")
            .join("pickrecon.db")
    }

    /// Load settings from the default location, falling back to defaults.
    /// A missing file is created with commented defaults.
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            Self::create_default_file(&path);
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{e}");
                eprintln!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load an explicit settings file. Unlike [`Settings::load`], errors are
    /// returned rather than replaced by defaults.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
        toml::from_str(&contents).map_err(|e| format!("Error parsing {}: {e}", path.display()))
    }

    fn create_default_file(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error creating config directory: {e}");
                return;
            }
        }
        if let Err(e) = fs::write(path, DEFAULT_FILE) {
            eprintln!("Error writing default settings.toml: {e}");
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database
            .clone()
            .unwrap_or_else(Self::default_database_path)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
