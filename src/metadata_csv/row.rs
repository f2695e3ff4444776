use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const COLLECTION_COLUMN: &str = "Collection";
pub const SONG_ID_COLUMN: &str = "SongId";

/// One record of the metadata sheet.
///
/// Columns the generator knows about get a named field, everything else is
/// kept verbatim in `extra` so the aggregate dump still carries it. A named
/// field is `None` when its column is missing from the header and
/// `Some("")` when the cell is merely empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRow {
    #[serde(rename = "Collection")]
    pub collection: String,
    #[serde(rename = "SongId")]
    pub song_id: String,
    #[serde(rename = "Song", default, skip_serializing_if = "Option::is_none")]
    pub song: Option<String>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Animation", default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
    #[serde(rename = "Image", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "Artist", default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(rename = "Genre", default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(rename = "BPM", default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<String>,
    #[serde(rename = "Duration", default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(rename = "Release Date", default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

impl SongRow {
    /// Builds a row from `(column, value)` pairs.
    ///
    /// Returns the offending column name when `Collection` or `SongId` is
    /// missing or empty.
    pub fn from_columns<'a, I>(columns: I) -> Result<SongRow, &'static str>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut row = SongRow::default();
        let mut collection = None;
        let mut song_id = None;

        for (column, value) in columns {
            let value = value.to_owned();
            match column {
                COLLECTION_COLUMN => collection = Some(value),
                SONG_ID_COLUMN => song_id = Some(value),
                _ => {
                    if let Some(slot) = row.named_slot(column) {
                        *slot = Some(value);
                    } else {
                        row.extra.insert(column.to_owned(), value);
                    }
                }
            }
        }

        row.collection = collection
            .filter(|c| !c.is_empty())
            .ok_or(COLLECTION_COLUMN)?;
        row.song_id = song_id.filter(|s| !s.is_empty()).ok_or(SONG_ID_COLUMN)?;
        Ok(row)
    }

    fn named_slot(&mut self, column: &str) -> Option<&mut Option<String>> {
        let slot = match column {
            "Song" => &mut self.song,
            "Description" => &mut self.description,
            "Animation" => &mut self.animation,
            "Image" => &mut self.image,
            "Artist" => &mut self.artist,
            "Genre" => &mut self.genre,
            "BPM" => &mut self.bpm,
            "Duration" => &mut self.duration,
            "Release Date" => &mut self.release_date,
            _ => return None,
        };
        Some(slot)
    }

    /// Looks a value up by its column name.
    pub fn field(&self, column: &str) -> Option<&str> {
        match column {
            COLLECTION_COLUMN => Some(self.collection.as_str()),
            SONG_ID_COLUMN => Some(self.song_id.as_str()),
            "Song" => self.song.as_deref(),
            "Description" => self.description.as_deref(),
            "Animation" => self.animation.as_deref(),
            "Image" => self.image.as_deref(),
            "Artist" => self.artist.as_deref(),
            "Genre" => self.genre.as_deref(),
            "BPM" => self.bpm.as_deref(),
            "Duration" => self.duration.as_deref(),
            "Release Date" => self.release_date.as_deref(),
            other => self.extra.get(other).map(String::as_str),
        }
    }
}
