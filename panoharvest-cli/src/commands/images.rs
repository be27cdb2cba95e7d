//! Images command - download directional imagery for acquired panoramas.

use std::path::{Path, PathBuf};

use clap::Args;

use panoharvest::imagery::{download_all, ImageFetcher, ImageSize, ImageStore};
use panoharvest::lookup::ReqwestClient;
use panoharvest::output::{read_metadata_csv, write_manifest_csv};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the images command.
#[derive(Debug, Args)]
pub struct ImagesArgs {
    /// Metadata CSV produced by the acquire command
    #[arg(long, default_value = "data/metadata.csv")]
    pub metadata: PathBuf,

    /// Manifest CSV to write (defaults next to the metadata file)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Root directory for downloaded images (default from config)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Image size as WIDTHxHEIGHT (default from config)
    #[arg(long)]
    pub size: Option<String>,

    /// Maps Platform API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// File containing the API key (first line)
    #[arg(long)]
    pub api_key_file: Option<PathBuf>,
}

/// Manifest path next to the metadata file: `metadata.csv` becomes
/// `metadata_images.csv`.
fn default_manifest_path(metadata: &Path) -> PathBuf {
    let stem = metadata
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "metadata".to_string());
    metadata.with_file_name(format!("{}_images.csv", stem))
}

/// Run the images command.
pub fn run(args: ImagesArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("images");
    let config = runner.config();

    // Resolve settings from CLI and config
    let api_key = runner.resolve_api_key(args.api_key, args.api_key_file)?;
    let size = match &args.size {
        Some(s) => s.parse::<ImageSize>()?,
        None => config.images.size,
    };
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.images.output_dir.clone());
    let manifest_path = args
        .manifest
        .unwrap_or_else(|| default_manifest_path(&args.metadata));

    let records = read_metadata_csv(&args.metadata)?;
    if records.is_empty() {
        return Err(CliError::Config(format!(
            "No records in '{}'; run 'panoharvest acquire' first",
            args.metadata.display()
        )));
    }

    println!(
        "Downloading {} images ({} panoramas x 4 headings) to {}...",
        records.len() * 4,
        records.len(),
        output_dir.display()
    );

    let client = ReqwestClient::new()?;
    let fetcher = ImageFetcher::new(client, api_key)
        .with_size(size)
        .with_max_retries(config.images.max_retries);
    let store = ImageStore::new(output_dir);

    let entries = download_all(&fetcher, &store, &records)?;

    write_manifest_csv(&manifest_path, &entries)?;
    println!();
    println!(
        "✓ Downloaded {} of {} panoramas, manifest at {}",
        entries.len(),
        records.len(),
        manifest_path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest_path() {
        let metadata = PathBuf::from("data/metadata.csv");
        assert_eq!(
            default_manifest_path(&metadata),
            PathBuf::from("data/metadata_images.csv")
        );
    }
}
