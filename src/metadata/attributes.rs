use crate::metadata_csv::SongRow;
use serde::{Deserialize, Serialize};

/// Columns copied into every document's `attributes`, in this order.
pub const TRAIT_NAMES: [&str; 4] = ["Artist", "Genre", "BPM", "Duration"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(trait_type: impl Into<String>, value: Option<String>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value,
        }
    }
}

/// One attribute per entry of [`TRAIT_NAMES`]. A column the row lacks still
/// produces its attribute, just without a value.
pub fn derive_attributes(row: &SongRow) -> Vec<Attribute> {
    TRAIT_NAMES
        .iter()
        .map(|name| Attribute::new(*name, row.field(name).map(str::to_owned)))
        .collect()
}
