use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use song_metadata_generator::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_INPUT_CSV, DEFAULT_OUTPUT_DIR,
};
use song_metadata_generator::metadata::{MetadataGenerator, DEFAULT_AGGREGATE_FILE_NAME};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "generate-metadata")]
#[command(about = "Generate per-song JSON metadata from a metadata CSV sheet")]
struct CliArgs {
    /// Path to the metadata CSV sheet (header row required).
    #[clap(value_parser = parse_path, default_value = DEFAULT_INPUT_CSV)]
    pub input_csv: PathBuf,

    /// Directory receiving one folder per collection and the aggregate dump.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Only generate the given collection. Can be repeated, defaults to all.
    #[clap(long = "collection", value_name = "ID")]
    pub collections: Vec<String>,

    /// Suffix for per-song files, e.g. "json". No suffix by default.
    #[clap(long)]
    pub extension: Option<String>,

    /// File name of the aggregate dump inside the output directory.
    #[clap(long, default_value = DEFAULT_AGGREGATE_FILE_NAME)]
    pub aggregate_file: String,

    /// Path to a TOML config file. Values in it override the CLI.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Only parse and check the sheet, don't write anything.
    #[clap(long)]
    pub check_only: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            input_csv: self.input_csv.clone(),
            output_dir: self.output_dir.clone(),
            collections: self.collections.clone(),
            extension: self.extension.clone(),
            aggregate_file: self.aggregate_file.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;
    let generator = MetadataGenerator::new(config.generator_settings());

    if cli_args.check_only {
        let parsed = generator.check()?;
        if parsed.skipped_rows() > 0 {
            warn!("{} rows would be left out", parsed.skipped_rows());
        }
        return Ok(());
    }

    info!("Writing metadata to {:?}", config.output_dir);
    let summary = generator.run().await?;

    info!("");
    info!("Generation Summary");
    info!("==================");
    info!("Documents generated: {}", summary.documents.len());
    info!("Files written: {}", summary.files_written);
    info!("Aggregate dump: {}", summary.aggregate_path.display());
    if !summary.problems.is_empty() {
        warn!("Row issues encountered: {}", summary.problems.len());
    }

    Ok(())
}
