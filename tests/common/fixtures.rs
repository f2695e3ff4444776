use anyhow::Result;
use song_metadata_generator::metadata::{
    CollectionSelection, GeneratorSettings, MetadataGenerator, OutputLayout,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A metadata sheet on disk with an empty output directory next to it.
pub struct TestSheet {
    pub dir: TempDir,
    pub csv_path: PathBuf,
    pub output_dir: PathBuf,
}

impl TestSheet {
    /// Writes `lines` joined by newlines as the sheet content.
    pub fn with_lines(lines: &[&str]) -> Result<Self> {
        let dir = TempDir::new()?;
        let csv_path = dir.path().join("metadata.csv");
        let output_dir = dir.path().join("metadata");
        fs::write(&csv_path, lines.join("\n") + "\n")?;
        Ok(Self {
            dir,
            csv_path,
            output_dir,
        })
    }

    pub fn generator(&self, collections: CollectionSelection) -> MetadataGenerator {
        self.generator_with_layout(collections, OutputLayout::new(&self.output_dir))
    }

    pub fn generator_with_layout(
        &self,
        collections: CollectionSelection,
        layout: OutputLayout,
    ) -> MetadataGenerator {
        MetadataGenerator::new(GeneratorSettings {
            input_csv: self.csv_path.clone(),
            layout,
            collections,
        })
    }

    pub fn read_output(&self, relative: &str) -> Result<serde_json::Value> {
        let bytes = fs::read(self.output_dir.join(relative))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
