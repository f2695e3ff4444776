use super::{RecordKey, SongRow};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

pub type CollectionSongs = IndexMap<RecordKey, SongRow>;

/// Rows grouped by collection, then by song id.
///
/// Both levels list array index keys (see [`RecordKey::array_index`]) in
/// ascending order first, then every other key in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetadataIndex {
    collections: IndexMap<RecordKey, CollectionSongs>,
}

/// Inserts `key` where the ordering rule puts a new key. An existing key
/// keeps its place and gets the new value.
fn insert_ordered<V>(map: &mut IndexMap<RecordKey, V>, key: RecordKey, value: V) -> Option<V> {
    if let Some(slot) = map.get_mut(&key) {
        return Some(std::mem::replace(slot, value));
    }
    match key.array_index() {
        Some(index) => {
            let position =
                map.partition_point(|k, _| k.array_index().is_some_and(|other| other < index));
            map.shift_insert(position, key, value);
        }
        None => {
            map.insert(key, value);
        }
    }
    None
}

impl MetadataIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `row` under its collection and song id.
    ///
    /// A row for an already known `(collection, song)` pair replaces the
    /// earlier one; the replaced row is returned.
    pub fn insert(&mut self, row: SongRow) -> Option<SongRow> {
        let collection = RecordKey::new(row.collection.clone());
        let song = RecordKey::new(row.song_id.clone());
        self.insert_keyed(collection, song, row)
    }

    fn insert_keyed(
        &mut self,
        collection: RecordKey,
        song: RecordKey,
        row: SongRow,
    ) -> Option<SongRow> {
        if let Some(songs) = self.collections.get_mut(&collection) {
            return insert_ordered(songs, song, row);
        }
        let mut songs = CollectionSongs::new();
        songs.insert(song, row);
        insert_ordered(&mut self.collections, collection, songs);
        None
    }

    pub fn contains_collection(&self, collection: &str) -> bool {
        self.collections.contains_key(&RecordKey::from(collection))
    }

    pub fn collection(&self, collection: &str) -> Option<&CollectionSongs> {
        self.collections.get(&RecordKey::from(collection))
    }

    pub fn get_song(&self, collection: &str, song: &str) -> Option<&SongRow> {
        self.collection(collection)?.get(&RecordKey::from(song))
    }

    pub fn collection_ids(&self) -> impl Iterator<Item = &RecordKey> {
        self.collections.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecordKey, &CollectionSongs)> {
        self.collections.iter()
    }

    pub fn collections_count(&self) -> usize {
        self.collections.len()
    }

    pub fn songs_count(&self) -> usize {
        self.collections.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

impl<'de> Deserialize<'de> for MetadataIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<RecordKey, CollectionSongs>::deserialize(deserializer)?;
        let mut index = MetadataIndex::new();
        for (collection, songs) in raw {
            for (song, row) in songs {
                index.insert_keyed(collection.clone(), song, row);
            }
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(collection: &str, song_id: &str, song: &str) -> SongRow {
        SongRow::from_columns([
            ("Collection", collection),
            ("SongId", song_id),
            ("Song", song),
        ])
        .unwrap()
    }

    fn song_ids(index: &MetadataIndex, collection: &str) -> Vec<String> {
        index
            .collection(collection)
            .unwrap()
            .keys()
            .map(|k| k.to_string())
            .collect()
    }

    #[test]
    fn test_groups_by_collection_and_song() {
        let mut index = MetadataIndex::new();
        index.insert(row("1", "1", "A"));
        index.insert(row("1", "2", "B"));
        index.insert(row("2", "1", "C"));

        assert_eq!(index.collections_count(), 2);
        assert_eq!(index.collection("1").map(|c| c.len()), Some(2));
        assert_eq!(index.collection("2").map(|c| c.len()), Some(1));
        assert_eq!(index.songs_count(), 3);
        assert_eq!(
            index.get_song("2", "1").and_then(|r| r.song.as_deref()),
            Some("C")
        );
    }

    #[test]
    fn test_last_row_wins() {
        let mut index = MetadataIndex::new();
        assert!(index.insert(row("2", "5", "first")).is_none());
        let replaced = index.insert(row("2", "5", "second"));

        assert_eq!(replaced.and_then(|r| r.song), Some("first".to_string()));
        assert_eq!(index.songs_count(), 1);
        assert_eq!(
            index.get_song("2", "5").and_then(|r| r.song.as_deref()),
            Some("second")
        );
    }

    #[test]
    fn test_index_keys_ascend_other_keys_keep_insertion_order() {
        let mut index = MetadataIndex::new();
        for song in ["b", "10", "01", "a", "2", "0"] {
            index.insert(row("1", song, song));
        }

        assert_eq!(song_ids(&index, "1"), vec!["0", "2", "10", "b", "01", "a"]);
    }

    #[test]
    fn test_replacing_keeps_position() {
        let mut index = MetadataIndex::new();
        for song in ["z", "y", "3"] {
            index.insert(row("1", song, "first"));
        }
        index.insert(row("1", "z", "second"));

        assert_eq!(song_ids(&index, "1"), vec!["3", "z", "y"]);
    }

    #[test]
    fn test_collection_order() {
        let mut index = MetadataIndex::new();
        for collection in ["beta", "3", "alpha", "1"] {
            index.insert(row(collection, "1", "A"));
        }

        let ids: Vec<&str> = index.collection_ids().map(RecordKey::as_str).collect();
        assert_eq!(ids, vec!["1", "3", "beta", "alpha"]);
    }

    #[test]
    fn test_serializes_as_two_level_map() {
        let mut index = MetadataIndex::new();
        index.insert(row("1", "1", "A"));

        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"1": {"1": {"Collection": "1", "SongId": "1", "Song": "A"}}})
        );
    }

    #[test]
    fn test_dump_keeps_key_order() {
        let mut index = MetadataIndex::new();
        for song in ["x", "2", "1"] {
            index.insert(row("1", song, song));
        }

        let json = serde_json::to_string(&index).unwrap();
        let parsed: MetadataIndex = serde_json::from_str(&json).unwrap();

        assert_eq!(song_ids(&parsed, "1"), vec!["1", "2", "x"]);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), json);
    }
}
