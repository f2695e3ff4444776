mod index;
mod key;
mod load;
mod parse;
mod row;

pub use index::{CollectionSongs, MetadataIndex};
pub use key::RecordKey;
pub use load::load_metadata;
pub use parse::{parse_metadata_csv, parse_metadata_reader, ParseError, ParsedMetadata, Problem};
pub use row::{SongRow, COLLECTION_COLUMN, SONG_ID_COLUMN};
