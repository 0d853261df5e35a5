//! Per-source selection state for multi-search.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping of source id to "selected for multi-search".
/// Serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(BTreeMap<String, bool>);

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// First-run preferences: every given source selected
    pub fn defaults_for<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self(ids.into_iter().map(|id| (id.to_string(), true)).collect())
    }

    /// Missing entries count as not selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: &str, selected: bool) {
        self.0.insert(id.to_string(), selected);
    }

    /// Flip the entry for `id` and return the new value
    pub fn toggle(&mut self, id: &str) -> bool {
        let selected = !self.is_selected(id);
        self.set(id, selected);
        selected
    }

    pub fn remove(&mut self, id: &str) -> Option<bool> {
        self.0.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
