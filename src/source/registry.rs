use super::SearchSource;
use crate::config;
use std::collections::HashSet;

/// Built-in sources followed by custom ones, in a single ordered collection.
/// Ids are unique across both lists.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    builtins: Vec<SearchSource>,
    custom: Vec<SearchSource>,
}

impl SourceRegistry {
    pub fn new(builtins: Vec<SearchSource>) -> Self {
        Self {
            builtins,
            custom: Vec::new(),
        }
    }

    /// Create a registry, adopting a restored custom list.
    /// Entries that would break id uniqueness are dropped.
    pub fn with_custom(builtins: Vec<SearchSource>, custom: Vec<SearchSource>) -> Self {
        let mut registry = Self::new(builtins);
        for mut source in custom {
            source.is_custom = true;
            let id = source.id.clone();
            if !registry.push_custom(source) {
                log::warn!("Dropping custom source with duplicate id '{}'", id);
            }
        }
        registry
    }

    pub fn builtins(&self) -> &[SearchSource] {
        &self.builtins
    }

    pub fn custom(&self) -> &[SearchSource] {
        &self.custom
    }

    /// All sources in registry order (built-ins first)
    pub fn iter(&self) -> impl Iterator<Item = &SearchSource> {
        self.builtins.iter().chain(self.custom.iter())
    }

    pub fn len(&self) -> usize {
        self.builtins.len() + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builtins.is_empty() && self.custom.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SearchSource> {
        self.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Append a custom source. Returns false if its id is already taken.
    pub fn push_custom(&mut self, source: SearchSource) -> bool {
        if source.id.is_empty() || self.contains(&source.id) {
            return false;
        }
        self.custom.push(source);
        true
    }

    /// Remove a custom source. Built-ins are never in the custom list.
    pub fn remove_custom(&mut self, id: &str) -> Option<SearchSource> {
        let index = self.custom.iter().position(|s| s.id == id)?;
        Some(self.custom.remove(index))
    }

    /// Generate a time-based id not yet present in the registry
    pub fn next_custom_id(&self, now_millis: u128) -> String {
        let taken: HashSet<&str> = self.iter().map(|s| s.id.as_str()).collect();
        let mut stamp = now_millis;
        loop {
            let id = format!("{}{}", config::CUSTOM_ID_PREFIX, stamp);
            if !taken.contains(id.as_str()) {
                return id;
            }
            stamp += 1;
        }
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new(SearchSource::builtins())
    }
}
