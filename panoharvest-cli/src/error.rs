//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use panoharvest::config::ConfigFileError;
use panoharvest::imagery::ImageryError;
use panoharvest::lookup::LookupError;
use panoharvest::output::OutputError;
use panoharvest::region::RegionError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration problem described in plain words
    Config(String),
    /// Configuration file could not be read or written
    ConfigFile(ConfigFileError),
    /// Region boundaries could not be loaded
    Regions(RegionError),
    /// Lookup service failure surfaced to the user
    Lookup(LookupError),
    /// Image download or storage failure
    Imagery(ImageryError),
    /// CSV output failure
    Output(OutputError),
    /// Every requested region failed to complete
    AllRegionsFailed,
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        if let CliError::Lookup(LookupError::Denied(_)) = self {
            eprintln!();
            eprintln!("The metadata service refused the request. Make sure:");
            eprintln!("  1. The Street View Static API is enabled for your key");
            eprintln!("  2. Billing is enabled for the project");
            eprintln!("  3. The key is valid and not over its quota");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Regions(e) => write!(f, "{}", e),
            CliError::Lookup(e) => write!(f, "{}", e),
            CliError::Imagery(e) => write!(f, "{}", e),
            CliError::Output(e) => write!(f, "{}", e),
            CliError::AllRegionsFailed => write!(f, "All requested regions failed"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Regions(e) => Some(e),
            CliError::Lookup(e) => Some(e),
            CliError::Imagery(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<RegionError> for CliError {
    fn from(e: RegionError) -> Self {
        CliError::Regions(e)
    }
}

impl From<LookupError> for CliError {
    fn from(e: LookupError) -> Self {
        CliError::Lookup(e)
    }
}

impl From<ImageryError> for CliError {
    fn from(e: ImageryError) -> Self {
        CliError::Imagery(e)
    }
}

impl From<OutputError> for CliError {
    fn from(e: OutputError) -> Self {
        CliError::Output(e)
    }
}
