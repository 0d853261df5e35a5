//! Tracks at most one live result window per search source.

use crate::config;
use crate::source::{SearchSource, UrlTemplateMode};
use std::collections::HashMap;

/// A window opened by a [`WindowHost`]
pub trait WindowHandle {
    /// True once the window has been closed, by the user or programmatically
    fn is_closed(&self) -> bool;
    fn focus(&self);
    /// Navigate the window in place
    fn replace_location(&self, url: &str);
    fn close(&self);
}

/// Host windowing capability
pub trait WindowHost {
    type Handle: WindowHandle + 'static;

    /// Open `url` in a new window tagged `name`. `None` means the host refused.
    fn open(&self, url: &str, name: &str, features: &str) -> Option<Self::Handle>;
}

/// Parsed form of a `key=value,key=value` feature string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowFeatures {
    pub noopener: bool,
    pub noreferrer: bool,
}

impl WindowFeatures {
    pub fn parse(features: &str) -> Self {
        let mut parsed = Self::default();
        for item in features.split(',') {
            let (key, value) = match item.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (item.trim(), "yes"),
            };
            let enabled = matches!(value.to_ascii_lowercase().as_str(), "yes" | "1" | "true" | "");
            match key.to_ascii_lowercase().as_str() {
                "noopener" => parsed.noopener = enabled,
                "noreferrer" => parsed.noreferrer = enabled,
                "" => {}
                other => log::debug!("Ignoring unknown window feature '{}'", other),
            }
        }
        parsed
    }
}

/// Deterministic window name for a source
pub fn window_name(source_id: &str) -> String {
    format!("{}{}", config::WINDOW_NAME_PREFIX, source_id)
}

/// True iff there is a handle and it has not been closed
pub fn is_live<W: WindowHandle>(handle: Option<&W>) -> bool {
    handle.is_some_and(|h| !h.is_closed())
}

/// Drop every closed window from `windows`. Returns how many were dropped.
pub fn prune_closed<W: WindowHandle>(windows: &mut HashMap<String, W>) -> usize {
    let before = windows.len();
    windows.retain(|_, w| !w.is_closed());
    before - windows.len()
}

/// What [`WindowManager::display`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOutcome {
    /// The tracked window was navigated in place
    Reused,
    /// A new window was opened and is now tracked
    Opened,
    /// The host refused to open a window
    Refused,
}

/// Maps source ids to their result windows
pub struct WindowManager<H: WindowHost> {
    host: H,
    handles: HashMap<String, Option<H::Handle>>,
    url_mode: UrlTemplateMode,
}

impl<H: WindowHost> WindowManager<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            handles: HashMap::new(),
            url_mode: UrlTemplateMode::default(),
        }
    }

    pub fn with_url_mode(mut self, mode: UrlTemplateMode) -> Self {
        self.url_mode = mode;
        self
    }

    /// Show the results of `query` on `source`, reusing its window if still open
    pub fn display(&mut self, source: &SearchSource, query: &str) -> DisplayOutcome {
        let target_url = source.url_for(query, self.url_mode);

        if let Some(handle) = self.handles.get(&source.id).and_then(Option::as_ref) {
            if !handle.is_closed() {
                log::debug!("Reusing window for '{}': {}", source.id, target_url);
                handle.replace_location(&target_url);
                handle.focus();
                return DisplayOutcome::Reused;
            }
        }

        let name = window_name(&source.id);
        let handle = self.host.open(&target_url, &name, config::WINDOW_FEATURES);
        let outcome = match &handle {
            Some(handle) => {
                handle.focus();
                log::info!("Opened window '{}': {}", name, target_url);
                DisplayOutcome::Opened
            }
            None => {
                log::warn!("Host refused to open window '{}'", name);
                DisplayOutcome::Refused
            }
        };
        self.handles.insert(source.id.clone(), handle);
        outcome
    }

    /// Whether `source_id` has a live tracked window
    pub fn is_tracking(&self, source_id: &str) -> bool {
        is_live(self.handles.get(source_id).and_then(Option::as_ref))
    }

    pub fn live_count(&self) -> usize {
        self.handles
            .values()
            .filter(|h| is_live(h.as_ref()))
            .count()
    }

    /// Close every live tracked window and forget all handles.
    /// Returns how many windows were closed.
    pub fn teardown_all(&mut self) -> usize {
        let mut closed = 0;
        for (source_id, handle) in self.handles.drain() {
            if let Some(handle) = handle.filter(|h| !h.is_closed()) {
                log::debug!("Closing window for '{}'", source_id);
                handle.close();
                closed += 1;
            }
        }
        if closed > 0 {
            log::info!("Closed {} result windows", closed);
        }
        closed
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::source::Category;

    fn google() -> SearchSource {
        SearchSource {
            id: "google".into(),
            name: "Google".into(),
            url_template: "https://www.google.com/search?q=".into(),
            description: String::new(),
            category: Category::General,
            is_custom: false,
        }
    }

    #[test]
    fn test_first_display_opens_named_isolated_window() {
        let host = RecordingHost::new();
        let opened = host.fake.opened.clone();
        let windows = host.windows.clone();
        let mut manager = WindowManager::new(host);

        assert_eq!(manager.display(&google(), "hello world"), DisplayOutcome::Opened);

        let opened = opened.borrow();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].0, "https://www.google.com/search?q=hello%20world");
        assert_eq!(opened[0].1, "multiseek-google");
        assert_eq!(opened[0].2, "noopener=yes,noreferrer=yes");
        assert_eq!(windows.borrow()[0].focus_count.get(), 1);
        assert!(manager.is_tracking("google"));
    }

    #[test]
    fn test_second_display_navigates_in_place() {
        let host = RecordingHost::new();
        let windows = host.windows.clone();
        let mut manager = WindowManager::new(host);

        manager.display(&google(), "first");
        assert_eq!(manager.display(&google(), "second"), DisplayOutcome::Reused);

        let windows = windows.borrow();
        assert_eq!(windows.len(), 1);
        assert_eq!(
            windows[0].locations.borrow().last().map(String::as_str),
            Some("https://www.google.com/search?q=second")
        );
        assert_eq!(windows[0].focus_count.get(), 2);
    }

    #[test]
    fn test_closed_window_is_replaced() {
        let host = RecordingHost::new();
        let windows = host.windows.clone();
        let mut manager = WindowManager::new(host);

        manager.display(&google(), "first");
        windows.borrow()[0].closed.set(true);
        assert!(!manager.is_tracking("google"));

        assert_eq!(manager.display(&google(), "second"), DisplayOutcome::Opened);
        assert_eq!(windows.borrow().len(), 2);
    }

    #[test]
    fn test_refused_open_retries_next_time() {
        let host = RecordingHost::new();
        let refuse = host.fake.refuse.clone();
        let opened = host.fake.opened.clone();
        let mut manager = WindowManager::new(host);

        refuse.set(true);
        assert_eq!(manager.display(&google(), "q"), DisplayOutcome::Refused);
        assert!(!manager.is_tracking("google"));

        refuse.set(false);
        assert_eq!(manager.display(&google(), "q"), DisplayOutcome::Opened);
        assert_eq!(opened.borrow().len(), 2);
    }

    #[test]
    fn test_teardown_closes_only_live_windows() {
        let host = RecordingHost::new();
        let windows = host.windows.clone();
        let mut manager = WindowManager::new(host);

        let mut bing = google();
        bing.id = "bing".into();
        manager.display(&google(), "q");
        manager.display(&bing, "q");
        windows.borrow()[1].closed.set(true);

        assert_eq!(manager.teardown_all(), 1);
        assert_eq!(windows.borrow()[0].close_count.get(), 1);
        assert_eq!(windows.borrow()[1].close_count.get(), 0);
        assert_eq!(manager.live_count(), 0);

        assert_eq!(manager.teardown_all(), 0);
        assert_eq!(windows.borrow()[0].close_count.get(), 1);
    }

    #[test]
    fn test_placeholder_mode_reaches_host() {
        let host = RecordingHost::new();
        let opened = host.fake.opened.clone();
        let mut manager = WindowManager::new(host).with_url_mode(UrlTemplateMode::Placeholder);

        let mut source = google();
        source.url_template = "https://x.com/find/%s/all".into();
        manager.display(&source, "a b");
        assert_eq!(opened.borrow()[0].0, "https://x.com/find/a%20b/all");
    }

    #[test]
    fn test_is_live_predicate() {
        let window = FakeWindow::default();
        assert!(!is_live::<FakeWindow>(None));
        assert!(is_live(Some(&window)));
        window.closed.set(true);
        assert!(!is_live(Some(&window)));
    }

    #[test]
    fn test_prune_closed_keeps_live_windows() {
        let live = FakeWindow::default();
        let closed = FakeWindow::default();
        closed.closed.set(true);

        let mut windows = HashMap::new();
        windows.insert("multiseek-google".to_string(), live);
        windows.insert("multiseek-bing".to_string(), closed);

        assert_eq!(prune_closed(&mut windows), 1);
        assert!(windows.contains_key("multiseek-google"));
        assert!(!windows.contains_key("multiseek-bing"));
        assert_eq!(prune_closed(&mut windows), 0);
    }

    #[test]
    fn test_parse_features() {
        let features = WindowFeatures::parse(config::WINDOW_FEATURES);
        assert!(features.noopener);
        assert!(features.noreferrer);

        let features = WindowFeatures::parse("noopener=no, width=300");
        assert!(!features.noopener);
        assert!(!features.noreferrer);

        assert_eq!(WindowFeatures::parse(""), WindowFeatures::default());
    }
}
