use super::Attribute;
use crate::metadata_csv::SongRow;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

/// Characters escaped when a whole URI is encoded. Reserved characters such
/// as `/`, `:` and `?` are left alone, as is `#`.
const URI: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

pub fn encode_uri(uri: &str) -> String {
    utf8_percent_encode(uri, URI).to_string()
}

/// The per-song document written to the output directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(rename = "trackNumber")]
    pub track_number: String,
    #[serde(
        rename = "originalReleaseDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_release_date: Option<String>,
}

impl SongMetadata {
    pub fn build(row: &SongRow, attributes: Vec<Attribute>) -> Self {
        Self {
            name: row.song.clone(),
            description: row.description.clone(),
            animation_url: row.animation.as_deref().map(encode_uri),
            image: row.image.as_deref().map(encode_uri),
            attributes,
            artist: row.artist.clone(),
            genre: row.genre.clone(),
            track_number: row.song_id.clone(),
            original_release_date: row.release_date.clone(),
        }
    }

    /// Compact JSON, the form written to disk.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::super::derive_attributes;
    use super::*;
    use percent_encoding::percent_decode_str;

    fn sample_row() -> SongRow {
        SongRow::from_columns([
            ("Collection", "1"),
            ("SongId", "1"),
            ("Song", "A"),
            ("Description", "d"),
            ("Animation", "http://a/b c.mp4"),
            ("Image", "http://a/i.png"),
            ("Artist", "X"),
            ("Genre", "Y"),
            ("BPM", "120"),
            ("Duration", "3:00"),
            ("Release Date", "2020"),
        ])
        .unwrap()
    }

    #[test]
    fn test_encode_uri_keeps_reserved_characters() {
        assert_eq!(encode_uri("http://a/b c.mp4"), "http://a/b%20c.mp4");
        assert_eq!(
            encode_uri("https://x.io/p?q=1&r=a+b#frag"),
            "https://x.io/p?q=1&r=a+b#frag"
        );
        assert_eq!(encode_uri("a%b[1]"), "a%25b%5B1%5D");
        assert_eq!(encode_uri("café"), "caf%C3%A9");
    }

    #[test]
    fn test_encode_uri_decodes_back() {
        for original in ["http://a/b c.mp4", "ipfs://Qm/файл {1}.png", "50% off|\"x\""] {
            let encoded = encode_uri(original);
            let decoded = percent_decode_str(&encoded).decode_utf8().unwrap();
            assert_eq!(decoded, original);
        }
    }

    #[test]
    fn test_build_from_row() {
        let row = sample_row();
        let doc = SongMetadata::build(&row, derive_attributes(&row));

        assert_eq!(doc.name.as_deref(), Some("A"));
        assert_eq!(doc.description.as_deref(), Some("d"));
        assert_eq!(doc.animation_url.as_deref(), Some("http://a/b%20c.mp4"));
        assert_eq!(doc.image.as_deref(), Some("http://a/i.png"));
        assert_eq!(doc.artist.as_deref(), Some("X"));
        assert_eq!(doc.genre.as_deref(), Some("Y"));
        assert_eq!(doc.track_number, "1");
        assert_eq!(doc.original_release_date.as_deref(), Some("2020"));
        assert_eq!(doc.attributes.len(), 4);
    }

    #[test]
    fn test_json_field_names_and_order() {
        let row = sample_row();
        let doc = SongMetadata::build(&row, derive_attributes(&row));
        let json = String::from_utf8(doc.to_json().unwrap()).unwrap();

        assert_eq!(
            json,
            concat!(
                r#"{"name":"A","description":"d","animation_url":"http://a/b%20c.mp4","#,
                r#""image":"http://a/i.png","attributes":[{"trait_type":"Artist","value":"X"},"#,
                r#"{"trait_type":"Genre","value":"Y"},{"trait_type":"BPM","value":"120"},"#,
                r#"{"trait_type":"Duration","value":"3:00"}],"artist":"X","genre":"Y","#,
                r#""trackNumber":"1","originalReleaseDate":"2020"}"#
            )
        );
    }

    #[test]
    fn test_missing_fields_are_omitted() {
        let row = SongRow::from_columns([("Collection", "1"), ("SongId", "9")]).unwrap();
        let doc = SongMetadata::build(&row, derive_attributes(&row));

        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            serde_json::json!({
                "attributes": [
                    {"trait_type": "Artist"},
                    {"trait_type": "Genre"},
                    {"trait_type": "BPM"},
                    {"trait_type": "Duration"},
                ],
                "trackNumber": "9",
            })
        );
    }
}
