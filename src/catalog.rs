//! Source registry and selection preferences, persisted on every change.

use crate::config;
use crate::preferences::Preferences;
use crate::source::{SearchSource, SourceDraft, SourceRegistry};
use crate::storage::{self, KeyValueStore};
use std::time::{SystemTime, UNIX_EPOCH};

/// Owns the merged source list, the selection map and the store they live in
pub struct Catalog<S: KeyValueStore> {
    store: S,
    registry: SourceRegistry,
    preferences: Preferences,
}

impl<S: KeyValueStore> Catalog<S> {
    /// Restore state from `store` using the built-in source table
    pub fn restore(store: S) -> Self {
        Self::restore_with(store, SearchSource::builtins())
    }

    /// Restore state from `store` on top of the given built-ins.
    ///
    /// Stored preferences are adopted verbatim, stale ids included. Without
    /// stored preferences every built-in is selected and that is persisted
    /// right away. Without a stored custom list the custom list is empty.
    pub fn restore_with(store: S, builtins: Vec<SearchSource>) -> Self {
        let custom: Vec<SearchSource> =
            storage::load_json(&store, config::CUSTOM_SOURCES_KEY).unwrap_or_default();
        let registry = SourceRegistry::with_custom(builtins, custom);

        let stored: Option<Preferences> = storage::load_json(&store, config::PREFERENCES_KEY);
        let first_run = stored.is_none();
        let preferences = stored.unwrap_or_else(|| {
            Preferences::defaults_for(registry.builtins().iter().map(|s| s.id.as_str()))
        });

        let mut catalog = Self {
            store,
            registry,
            preferences,
        };

        if first_run {
            log::info!("No stored preferences, selecting all built-in sources");
            catalog.persist_preferences();
        }

        log::info!(
            "Catalog restored: {} sources ({} custom), {} selected",
            catalog.registry.len(),
            catalog.registry.custom().len(),
            catalog.selected_sources().len()
        );

        catalog
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All sources in registry order
    pub fn sources(&self) -> impl Iterator<Item = &SearchSource> {
        self.registry.iter()
    }

    pub fn source(&self, id: &str) -> Option<&SearchSource> {
        self.registry.get(id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.preferences.is_selected(id)
    }

    /// Selected sources in registry order
    pub fn selected_sources(&self) -> Vec<&SearchSource> {
        self.registry
            .iter()
            .filter(|s| self.preferences.is_selected(&s.id))
            .collect()
    }

    /// Add a user-defined source and select it. Returns the assigned id,
    /// or `None` if name or URL template is empty.
    pub fn add_custom_source(&mut self, draft: SourceDraft) -> Option<String> {
        if !draft.is_valid() {
            log::debug!("Rejected custom source with empty name or URL template");
            return None;
        }

        let id = self.registry.next_custom_id(now_millis());
        let source = draft.into_source(id.clone());
        log::info!("Adding custom source '{}' ({})", source.name, id);

        if !self.registry.push_custom(source) {
            log::warn!("Custom source id '{}' already taken", id);
            return None;
        }
        self.persist_custom_sources();

        self.preferences.set(&id, true);
        self.persist_preferences();

        Some(id)
    }

    /// Delete a user-defined source and its preference entry.
    /// Built-in ids are not custom and are left untouched.
    pub fn delete_custom_source(&mut self, id: &str) -> bool {
        let Some(removed) = self.registry.remove_custom(id) else {
            log::debug!("No custom source '{}' to delete", id);
            return false;
        };
        log::info!("Deleted custom source '{}' ({})", removed.name, id);
        self.persist_custom_sources();

        self.preferences.remove(id);
        self.persist_preferences();

        true
    }

    /// Flip selection for `id` and return the new value
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        let selected = self.preferences.toggle(id);
        log::debug!("Source '{}' selected={}", id, selected);
        self.persist_preferences();
        selected
    }

    fn persist_preferences(&mut self) {
        if let Err(e) = storage::save_json(&mut self.store, config::PREFERENCES_KEY, &self.preferences) {
            log::error!("Failed to save preferences: {}", e);
        }
    }

    fn persist_custom_sources(&mut self) {
        if let Err(e) =
            storage::save_json(&mut self.store, config::CUSTOM_SOURCES_KEY, self.registry.custom())
        {
            log::error!("Failed to save custom sources: {}", e);
        }
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Category;
    use crate::storage::MemoryStore;

    fn builtin(id: &str) -> SearchSource {
        SearchSource {
            id: id.into(),
            name: id.into(),
            url_template: format!("https://{}.example/?q=", id),
            description: String::new(),
            category: Category::General,
            is_custom: false,
        }
    }

    fn builtins() -> Vec<SearchSource> {
        vec![builtin("google"), builtin("bing")]
    }

    fn stored_preferences(catalog: &Catalog<MemoryStore>) -> Preferences {
        storage::load_json(catalog.store(), config::PREFERENCES_KEY).unwrap()
    }

    fn stored_custom(catalog: &Catalog<MemoryStore>) -> Vec<SearchSource> {
        storage::load_json(catalog.store(), config::CUSTOM_SOURCES_KEY).unwrap()
    }

    #[test]
    fn test_first_run_selects_and_persists_builtins() {
        let catalog = Catalog::restore_with(MemoryStore::new(), builtins());

        let expected = Preferences::defaults_for(["google", "bing"]);
        assert_eq!(catalog.preferences(), &expected);
        assert_eq!(stored_preferences(&catalog), expected);
        assert_eq!(
            catalog.store().get(config::PREFERENCES_KEY).as_deref(),
            Some(r#"{"bing":true,"google":true}"#)
        );
        assert!(catalog.registry().custom().is_empty());
    }

    #[test]
    fn test_stored_preferences_adopted_verbatim() {
        let store = MemoryStore::new()
            .with_entry(config::PREFERENCES_KEY, r#"{"google":false,"deleted-long-ago":true}"#);
        let catalog = Catalog::restore_with(store, builtins());

        assert!(!catalog.is_selected("google"));
        assert!(!catalog.is_selected("bing"));
        assert!(catalog.preferences().contains("deleted-long-ago"));
        assert!(catalog.selected_sources().is_empty());
    }

    #[test]
    fn test_corrupt_storage_falls_back_to_defaults() {
        let store = MemoryStore::new()
            .with_entry(config::PREFERENCES_KEY, "{{{")
            .with_entry(config::CUSTOM_SOURCES_KEY, "not a list");
        let catalog = Catalog::restore_with(store, builtins());

        assert!(catalog.is_selected("google"));
        assert!(catalog.is_selected("bing"));
        assert!(catalog.registry().custom().is_empty());
        assert_eq!(stored_preferences(&catalog), Preferences::defaults_for(["google", "bing"]));
    }

    #[test]
    fn test_restores_custom_sources() {
        let store = MemoryStore::new().with_entry(
            config::CUSTOM_SOURCES_KEY,
            r#"[{"id":"custom-1","name":"X","urlTemplate":"https://x.com/?q=","description":"","category":"academic","isCustom":true}]"#,
        );
        let catalog = Catalog::restore_with(store, builtins());

        let ids: Vec<&str> = catalog.sources().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["google", "bing", "custom-1"]);
        assert_eq!(catalog.source("custom-1").unwrap().category, Category::Academic);
    }

    #[test]
    fn test_add_custom_source() {
        let mut catalog = Catalog::restore_with(MemoryStore::new(), builtins());
        let mut draft = SourceDraft::new("X", "https://x.com/?q=");
        draft.id = Some("google".into());

        let id = catalog.add_custom_source(draft).unwrap();
        assert_ne!(id, "google");
        assert!(id.starts_with(config::CUSTOM_ID_PREFIX));

        let source = catalog.source(&id).unwrap();
        assert!(source.is_custom);
        assert_eq!(source.name, "X");
        assert!(catalog.is_selected(&id));

        let custom = stored_custom(&catalog);
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].id, id);
        assert!(stored_preferences(&catalog).is_selected(&id));
    }

    #[test]
    fn test_add_rejects_empty_fields() {
        let mut catalog = Catalog::restore_with(MemoryStore::new(), builtins());
        assert!(catalog.add_custom_source(SourceDraft::new("", "https://x.com/?q=")).is_none());
        assert!(catalog.add_custom_source(SourceDraft::new("X", "")).is_none());
        assert!(catalog.registry().custom().is_empty());
        assert!(catalog.store().get(config::CUSTOM_SOURCES_KEY).is_none());
    }

    #[test]
    fn test_added_ids_are_unique() {
        let mut catalog = Catalog::restore_with(MemoryStore::new(), builtins());
        let a = catalog.add_custom_source(SourceDraft::new("A", "https://a/?q=")).unwrap();
        let b = catalog.add_custom_source(SourceDraft::new("B", "https://b/?q=")).unwrap();
        assert_ne!(a, b);
        assert_eq!(catalog.registry().custom().len(), 2);
    }

    #[test]
    fn test_delete_removes_source_and_preference() {
        let mut catalog = Catalog::restore_with(MemoryStore::new(), builtins());
        let id = catalog.add_custom_source(SourceDraft::new("X", "https://x.com/?q=")).unwrap();

        assert!(catalog.delete_custom_source(&id));
        assert!(catalog.source(&id).is_none());
        assert!(!catalog.preferences().contains(&id));
        assert!(stored_custom(&catalog).is_empty());
        assert!(!stored_preferences(&catalog).contains(&id));

        assert!(!catalog.delete_custom_source(&id));
    }

    #[test]
    fn test_builtins_cannot_be_deleted() {
        let mut catalog = Catalog::restore_with(MemoryStore::new(), builtins());
        assert!(!catalog.delete_custom_source("google"));
        assert!(catalog.source("google").is_some());
        assert!(catalog.is_selected("google"));
    }

    #[test]
    fn test_toggle_twice_round_trips() {
        let mut catalog = Catalog::restore_with(MemoryStore::new(), builtins());

        assert!(!catalog.toggle_selection("google"));
        assert_eq!(&stored_preferences(&catalog), catalog.preferences());
        assert!(catalog.toggle_selection("google"));
        assert_eq!(&stored_preferences(&catalog), catalog.preferences());
        assert!(catalog.is_selected("google"));
    }

    #[test]
    fn test_toggle_unknown_id_creates_selected_entry() {
        let mut catalog = Catalog::restore_with(MemoryStore::new(), builtins());
        assert!(catalog.toggle_selection("new"));
        assert!(stored_preferences(&catalog).is_selected("new"));
    }

    #[test]
    fn test_selected_sources_follow_registry_order() {
        let mut catalog = Catalog::restore_with(MemoryStore::new(), builtins());
        let id = catalog.add_custom_source(SourceDraft::new("X", "https://x.com/?q=")).unwrap();
        catalog.toggle_selection("google");

        let ids: Vec<&str> = catalog.selected_sources().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["bing", id.as_str()]);
    }
}
