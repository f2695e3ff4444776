use super::{derive_attributes, write_file, DocumentWriter, OutputLayout, SongMetadata};
use crate::metadata_csv::{load_metadata, MetadataIndex, ParsedMetadata, Problem, RecordKey};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Which collections of the sheet get documents generated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CollectionSelection {
    #[default]
    All,
    Only(Vec<String>),
}

impl CollectionSelection {
    /// An empty list selects every collection.
    pub fn from_ids(ids: Vec<String>) -> Self {
        if ids.is_empty() {
            CollectionSelection::All
        } else {
            CollectionSelection::Only(ids)
        }
    }

    /// Collection keys to process, in processing order.
    pub fn resolve(&self, index: &MetadataIndex) -> Result<Vec<RecordKey>> {
        match self {
            CollectionSelection::All => Ok(index.collection_ids().cloned().collect()),
            CollectionSelection::Only(ids) => {
                let mut keys: Vec<RecordKey> = Vec::with_capacity(ids.len());
                for id in ids {
                    if !index.contains_collection(id) {
                        bail!("Collection {} not found in the metadata sheet", id);
                    }
                    let key = RecordKey::from(id.as_str());
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
                Ok(keys)
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct GeneratorSettings {
    pub input_csv: PathBuf,
    pub layout: OutputLayout,
    pub collections: CollectionSelection,
}

#[derive(Clone, Debug)]
pub struct GeneratedDocument {
    pub collection: RecordKey,
    pub song: RecordKey,
    pub path: PathBuf,
    pub metadata: SongMetadata,
}

#[derive(Debug)]
pub struct RunSummary {
    pub documents: Vec<GeneratedDocument>,
    pub problems: Vec<Problem>,
    /// Per-song documents plus the aggregate dump.
    pub files_written: usize,
    pub aggregate_path: PathBuf,
}

pub struct MetadataGenerator {
    settings: GeneratorSettings,
}

impl MetadataGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Parses the sheet and validates the collection selection, writes
    /// nothing.
    pub fn check(&self) -> Result<ParsedMetadata> {
        let parsed = load_metadata(&self.settings.input_csv)?;
        let selected = self.settings.collections.resolve(&parsed.index)?;
        let songs: usize = selected
            .iter()
            .filter_map(|c| parsed.index.collection(c.as_str()))
            .map(|songs| songs.len())
            .sum();
        info!(
            "{} collections selected, {} documents would be generated",
            selected.len(),
            songs
        );
        Ok(parsed)
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let parsed = load_metadata(&self.settings.input_csv)?;
        self.generate(parsed).await
    }

    /// Writes one document per selected song, waits for all of them, then
    /// dumps the whole index to the aggregate file.
    pub async fn generate(&self, parsed: ParsedMetadata) -> Result<RunSummary> {
        let layout = &self.settings.layout;
        let index = &parsed.index;
        let selected = self.settings.collections.resolve(index)?;
        check_path_keys(index, &selected)?;

        let mut writer = DocumentWriter::new();
        let mut documents = Vec::new();

        for collection in selected {
            let Some(songs) = index.collection(collection.as_str()) else {
                continue;
            };
            debug!(
                "Collection {} songs: {:?}",
                collection,
                songs.keys().map(RecordKey::as_str).collect::<Vec<_>>()
            );

            for (song, row) in songs {
                info!(
                    "Creating metadata for collection {} song {}",
                    collection, song
                );
                let metadata = SongMetadata::build(row, derive_attributes(row));
                let json = metadata.to_json().with_context(|| {
                    format!(
                        "Could not serialize metadata for collection {} song {}",
                        collection, song
                    )
                })?;
                debug!("- metadata: {}", String::from_utf8_lossy(&json));

                let path = layout.song_path(collection.as_str(), song.as_str());
                writer.submit(path.clone(), json);
                documents.push(GeneratedDocument {
                    collection: collection.clone(),
                    song: song.clone(),
                    path,
                    metadata,
                });
            }
        }

        info!("Waiting for {} documents to be written...", writer.pending());
        let mut files_written = writer
            .finish()
            .await
            .context("Failed to write song metadata")?;

        let aggregate_path = layout.aggregate_path();
        let dump = serde_json::to_vec(index).context("Could not serialize metadata index")?;
        write_file(&aggregate_path, &dump)
            .await
            .context("Failed to write aggregate metadata")?;
        files_written += 1;

        info!(
            "Generated {} documents, aggregate written to {}",
            documents.len(),
            aggregate_path.display()
        );

        Ok(RunSummary {
            documents,
            problems: parsed.problems,
            files_written,
            aggregate_path,
        })
    }
}

/// Every id ends up as a file or directory name under the output directory.
fn check_path_keys(index: &MetadataIndex, selected: &[RecordKey]) -> Result<()> {
    for collection in selected {
        if !collection.is_path_component() {
            bail!(
                "Collection id {:?} is not usable as a directory name",
                collection.as_str()
            );
        }
        let Some(songs) = index.collection(collection.as_str()) else {
            continue;
        };
        if let Some(song) = songs.keys().find(|song| !song.is_path_component()) {
            bail!(
                "Song id {:?} in collection {} is not usable as a file name",
                song.as_str(),
                collection
            );
        }
    }
    Ok(())
}
