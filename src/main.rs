use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use heictrail::build;
use heictrail::config::Config;

/// Post-processes a journal HTML export: converts HEIC images to PNG and
/// embeds trip maps built from location sidecars.
#[derive(Parser)]
#[command(name = "heictrail", version)]
struct Cli {
    /// Exported journal directory to process
    #[arg(default_value = ".")]
    source: PathBuf,

    /// Output directory (defaults to a `_png`-suffixed sibling of the
    /// source)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let source = fs::canonicalize(&cli.source)
        .with_context(|| format!("Resolving source directory '{}'", cli.source.display()))?;
    let config = match cli.output {
        Some(output) => Config::new(source, output),
        None => Config::from_source(source),
    };

    build::process_export(&config)?;
    info!(
        "finished, new version is in {}",
        config.output_directory.display()
    );
    Ok(())
}
