mod file_config;

pub use file_config::FileConfig;

use crate::metadata::{
    CollectionSelection, GeneratorSettings, OutputLayout, DEFAULT_AGGREGATE_FILE_NAME,
};
use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_INPUT_CSV: &str = "src/csv/Drop - Metadata Final.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "src/metadata";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub input_csv: PathBuf,
    pub output_dir: PathBuf,
    pub collections: Vec<String>,
    pub extension: Option<String>,
    pub aggregate_file: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            input_csv: PathBuf::from(DEFAULT_INPUT_CSV),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            collections: Vec::new(),
            extension: None,
            aggregate_file: DEFAULT_AGGREGATE_FILE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input_csv: PathBuf,
    pub output_dir: PathBuf,
    pub collections: CollectionSelection,
    /// Per-song file suffix without the leading dot.
    pub extension: Option<String>,
    pub aggregate_file: String,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let input_csv = file
            .input_csv
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.input_csv.clone());
        if !input_csv.exists() {
            bail!("Input CSV does not exist: {:?}", input_csv);
        }
        if !input_csv.is_file() {
            bail!("Input CSV is not a file: {:?}", input_csv);
        }

        let output_dir = file
            .output_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.output_dir.clone());
        if output_dir.exists() && !output_dir.is_dir() {
            bail!("output_dir is not a directory: {:?}", output_dir);
        }

        let collections = CollectionSelection::from_ids(
            file.collections.unwrap_or_else(|| cli.collections.clone()),
        );

        let extension = normalize_extension(file.extension.or_else(|| cli.extension.clone()));

        let aggregate_file = file
            .aggregate_file
            .unwrap_or_else(|| cli.aggregate_file.clone());
        if aggregate_file.is_empty() {
            bail!("aggregate_file must not be empty");
        }

        Ok(Self {
            input_csv,
            output_dir,
            collections,
            extension,
            aggregate_file,
        })
    }

    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.output_dir)
            .with_extension(self.extension.clone())
            .with_aggregate_file_name(&self.aggregate_file)
    }

    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            input_csv: self.input_csv.clone(),
            layout: self.layout(),
            collections: self.collections.clone(),
        }
    }
}

/// Strips a leading dot; an empty extension means none.
fn normalize_extension(extension: Option<String>) -> Option<String> {
    extension
        .map(|ext| ext.trim_start_matches('.').to_string())
        .filter(|ext| !ext.is_empty())
}
