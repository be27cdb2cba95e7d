//! Configuration for panoharvest.
//!
//! User configuration lives in `~/.panoharvest/config.ini` and is loaded
//! with sensible defaults when the file or individual keys are absent.
//! Settings structs live in [`settings`], constants in [`defaults`], file
//! handling in [`file`], and typed key access for the `config` CLI
//! subcommands in [`keys`].

mod defaults;
mod file;
mod keys;
mod settings;

pub use defaults::*;
pub use file::{config_directory, config_file_path, load_api_key, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{
    AcquireSettings, ConfigFile, ImageSettings, LoggingSettings, LookupSettings, RegionSettings,
};
