use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A named, ordered grouping of asset names, persisted as one JSON document.
///
/// `photo_list` never holds duplicates and is kept sorted descending, which
/// for asset names means newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    /// Millisecond epoch timestamp taken at creation.
    pub id: String,
    /// Display name, never empty.
    pub name: String,
    /// Asset names in the album, newest first.
    #[serde(default)]
    pub photo_list: Vec<String>,
}

impl Album {
    /// Create an album, normalizing the initial photo list.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, photos: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            photo_list: normalize(photos),
        }
    }

    /// Union the given names into the list.
    pub fn add_photos(&mut self, names: &[String]) {
        let mut merged = std::mem::take(&mut self.photo_list);
        merged.extend(names.iter().cloned());
        self.photo_list = normalize(merged);
    }

    /// Drop every occurrence of the given names from the list.
    pub fn remove_photos(&mut self, names: &[String]) {
        let remove: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        let kept = std::mem::take(&mut self.photo_list)
            .into_iter()
            .filter(|name| !remove.contains(name.as_str()))
            .collect();
        self.photo_list = normalize(kept);
    }
}

/// Dedupe and sort descending.
fn normalize(photos: Vec<String>) -> Vec<String> {
    let set: BTreeSet<String> = photos.into_iter().collect();
    set.into_iter().rev().collect()
}
