//! CLI runner for common setup and operations.
//!
//! Encapsulates logging initialization, configuration loading, and API key
//! resolution to reduce duplication across command handlers.

use std::path::PathBuf;

use tracing::info;

use panoharvest::config::{load_api_key, ConfigFile};
use panoharvest::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    pub fn new() -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load().map_err(|e| CliError::Config(e.to_string()))?;

        // Use log path from config
        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "panoharvest.log".to_string());

        let logging_guard = init_logging(&log_dir, &log_file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("panoharvest v{}", panoharvest::VERSION);
        info!("panoharvest CLI: {} command", command);
    }

    /// Resolve the API key from CLI flags and configuration, in priority
    /// order: `--api-key`, `--api-key-file`, then `lookup.api_key_file`
    /// from the config file.
    pub fn resolve_api_key(
        &self,
        flag_key: Option<String>,
        flag_key_file: Option<PathBuf>,
    ) -> Result<String, CliError> {
        if let Some(key) = flag_key {
            let key = key.trim().to_string();
            if key.is_empty() {
                return Err(CliError::Config("--api-key is empty".to_string()));
            }
            return Ok(key);
        }

        let key_file = flag_key_file.or_else(|| self.config.lookup.api_key_file.clone());
        match key_file {
            Some(path) => Ok(load_api_key(&path)?),
            None => Err(CliError::Config(
                "No API key configured. Pass --api-key, --api-key-file, or set \
                 lookup.api_key_file with 'panoharvest config set'"
                    .to_string(),
            )),
        }
    }
}
