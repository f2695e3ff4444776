use std::path::{Path, PathBuf};

pub const DEFAULT_AGGREGATE_FILE_NAME: &str = "test.json";

/// Where generated files land inside the output directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    output_dir: PathBuf,
    /// Suffix appended to per-song files, without the leading dot.
    extension: Option<String>,
    aggregate_file_name: String,
}

impl OutputLayout {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: None,
            aggregate_file_name: DEFAULT_AGGREGATE_FILE_NAME.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }

    pub fn with_aggregate_file_name(mut self, name: impl Into<String>) -> Self {
        self.aggregate_file_name = name.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn collection_dir(&self, collection: &str) -> PathBuf {
        self.output_dir.join(collection)
    }

    pub fn song_path(&self, collection: &str, song: &str) -> PathBuf {
        let file_name = match &self.extension {
            Some(ext) => format!("{}.{}", song, ext),
            None => song.to_string(),
        };
        self.collection_dir(collection).join(file_name)
    }

    pub fn aggregate_path(&self) -> PathBuf {
        self.output_dir.join(&self.aggregate_file_name)
    }
}
