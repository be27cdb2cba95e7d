//! Panoharvest CLI - Command-line interface
//!
//! This binary provides a command-line interface to the panoharvest
//! library: acquiring panorama locations for regions, downloading their
//! directional imagery, and managing configuration.

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod runner;

use commands::{acquire, config, images};

#[derive(Parser)]
#[command(name = "panoharvest")]
#[command(version = panoharvest::VERSION)]
#[command(about = "Acquire street-level panorama locations and imagery", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Acquire unique panorama locations for a list of regions
    Acquire(acquire::AcquireArgs),

    /// Download four directional images per acquired panorama
    Images(images::ImagesArgs),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Acquire(args) => acquire::run(args),
        Command::Images(args) => images::run(args),
        Command::Config { command } => config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
