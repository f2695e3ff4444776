//! Song Metadata Generator Library
//!
//! Turns a metadata CSV export into one JSON document per song, plus an
//! aggregate dump of the parsed rows. The binary in `main.rs` is a thin
//! wrapper around [`metadata::MetadataGenerator`].

pub mod config;
pub mod metadata;
pub mod metadata_csv;

// Re-export commonly used types for convenience
pub use metadata::{MetadataGenerator, RunSummary, SongMetadata};
pub use metadata_csv::{load_metadata, parse_metadata_csv, MetadataIndex, ParsedMetadata, SongRow};
