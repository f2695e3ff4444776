mod attributes;
mod document;
mod generator;
mod layout;
mod writer;

pub use attributes::{derive_attributes, Attribute, TRAIT_NAMES};
pub use document::{encode_uri, SongMetadata};
pub use generator::{
    CollectionSelection, GeneratedDocument, GeneratorSettings, MetadataGenerator, RunSummary,
};
pub use layout::{OutputLayout, DEFAULT_AGGREGATE_FILE_NAME};
pub use writer::{write_file, DocumentWriter, WriteError};
