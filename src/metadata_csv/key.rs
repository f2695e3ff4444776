use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};

/// Largest value accepted as an array index key.
const MAX_INDEX: u32 = u32::MAX - 1;

/// Identifier of a collection or of a song inside a collection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key's value when it is written as a canonical array index: plain
    /// decimal digits without leading zeros, below `u32::MAX`. `"7"` is an
    /// index, `"07"` and `"-1"` are not.
    ///
    /// Index keys are kept in ascending numeric order ahead of all other
    /// keys, which stay in insertion order.
    pub fn array_index(&self) -> Option<u32> {
        let s = self.0.as_str();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if s.len() > 1 && s.starts_with('0') {
            return None;
        }
        s.parse::<u32>().ok().filter(|i| *i <= MAX_INDEX)
    }

    /// Whether the key can be used as one file or directory name: a single
    /// normal path component with no separator in it.
    pub fn is_path_component(&self) -> bool {
        let s = self.0.as_str();
        if s.is_empty() || s.contains(['/', '\\', '\0']) {
            return false;
        }
        let mut components = Path::new(s).components();
        matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        )
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}
