//! Configuration file handling for ~/.panoharvest/config.ini.

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;
use crate::imagery::ImageSize;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),

    /// API key file missing or unusable
    #[error("Failed to load API key from '{path}': {reason}")]
    ApiKey { path: String, reason: String },
}

impl ConfigFile {
    /// Load configuration from the default path (~/.panoharvest/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults. Keys absent from the
    /// file keep their default values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.panoharvest/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = to_config_string(self);
        fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            let config = Self::default();
            config.save_to(&path)?;
        }
        Ok(path)
    }
}

/// Get the path to the config directory (~/.panoharvest).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".panoharvest")
}

/// Get the path to the config file (~/.panoharvest/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Load an API key from a key file: first line, trimmed.
pub fn load_api_key(path: &Path) -> Result<String, ConfigFileError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigFileError::ApiKey {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let key = contents.lines().next().unwrap_or("").trim().to_string();
    if key.is_empty() {
        return Err(ConfigFileError::ApiKey {
            path: path.display().to_string(),
            reason: "file is empty".to_string(),
        });
    }
    Ok(key)
}

/// Parse a loaded INI document into a `ConfigFile`, starting from defaults.
fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(value) = get(ini, "lookup", "api_key_file") {
        config.lookup.api_key_file = Some(PathBuf::from(value));
    }
    config.lookup.radius_m = parse_value(ini, "lookup", "radius_m", config.lookup.radius_m)?;

    config.acquire.quota = parse_value(ini, "acquire", "quota", config.acquire.quota)?;
    config.acquire.batch_size =
        parse_value(ini, "acquire", "batch_size", config.acquire.batch_size)?;
    config.acquire.stall_ceiling =
        parse_value(ini, "acquire", "stall_ceiling", config.acquire.stall_ceiling)?;
    config.acquire.min_request_interval_ms = parse_value(
        ini,
        "acquire",
        "min_request_interval_ms",
        config.acquire.min_request_interval_ms,
    )?;
    config.acquire.retry_base_delay_ms = parse_value(
        ini,
        "acquire",
        "retry_base_delay_ms",
        config.acquire.retry_base_delay_ms,
    )?;

    if let Some(value) = get(ini, "regions", "boundaries_file") {
        config.regions.boundaries_file = Some(PathBuf::from(value));
    }
    if let Some(value) = get(ini, "regions", "name_property") {
        config.regions.name_property = value.to_string();
    }

    if let Some(value) = get(ini, "images", "size") {
        config.images.size = value
            .parse::<ImageSize>()
            .map_err(|e| ConfigFileError::InvalidValue {
                section: "images".to_string(),
                key: "size".to_string(),
                value: value.to_string(),
                reason: e.to_string(),
            })?;
    }
    if let Some(value) = get(ini, "images", "output_dir") {
        config.images.output_dir = PathBuf::from(value);
    }
    config.images.max_retries =
        parse_value(ini, "images", "max_retries", config.images.max_retries)?;

    if let Some(value) = get(ini, "logging", "file") {
        config.logging.file = PathBuf::from(value);
    }

    Ok(config)
}

fn get<'a>(ini: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    ini.get_from(Some(section), key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn parse_value<T: std::str::FromStr>(
    ini: &Ini,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, ConfigFileError> {
    match get(ini, section, key) {
        Some(value) => value.parse().map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "not a valid number".to_string(),
        }),
        None => Ok(default),
    }
}

/// Serialize a `ConfigFile` to INI text.
fn to_config_string(config: &ConfigFile) -> String {
    let mut out = String::new();

    out.push_str("[lookup]\n");
    if let Some(path) = &config.lookup.api_key_file {
        out.push_str(&format!("api_key_file = {}\n", path.display()));
    }
    out.push_str(&format!("radius_m = {}\n\n", config.lookup.radius_m));

    out.push_str("[acquire]\n");
    out.push_str(&format!("quota = {}\n", config.acquire.quota));
    out.push_str(&format!("batch_size = {}\n", config.acquire.batch_size));
    out.push_str(&format!(
        "stall_ceiling = {}\n",
        config.acquire.stall_ceiling
    ));
    out.push_str(&format!(
        "min_request_interval_ms = {}\n",
        config.acquire.min_request_interval_ms
    ));
    out.push_str(&format!(
        "retry_base_delay_ms = {}\n\n",
        config.acquire.retry_base_delay_ms
    ));

    out.push_str("[regions]\n");
    if let Some(path) = &config.regions.boundaries_file {
        out.push_str(&format!("boundaries_file = {}\n", path.display()));
    }
    out.push_str(&format!(
        "name_property = {}\n\n",
        config.regions.name_property
    ));

    out.push_str("[images]\n");
    out.push_str(&format!("size = {}\n", config.images.size));
    out.push_str(&format!(
        "output_dir = {}\n",
        config.images.output_dir.display()
    ));
    out.push_str(&format!("max_retries = {}\n\n", config.images.max_retries));

    out.push_str("[logging]\n");
    out.push_str(&format!("file = {}\n", config.logging.file.display()));

    out
}
