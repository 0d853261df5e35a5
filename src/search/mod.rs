//! Turns one query into a staggered series of window displays.

mod scheduler;

pub use scheduler::{GlibScheduler, Scheduler};

#[cfg(test)]
pub(crate) use scheduler::testing;

use crate::catalog::Catalog;
use crate::source::SearchSource;
use crate::storage::KeyValueStore;
use crate::window_manager::{WindowHost, WindowManager};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Delay before the `index`-th display of a multi-search
pub fn stagger_delay(index: usize, interval: Duration) -> Duration {
    interval.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Dispatches queries to the window manager.
///
/// Multi-searches are spread out over time because hosts tend to block bursts
/// of window opens. Each multi-search starts a new generation; tasks from an
/// older generation do nothing when `cancel_previous` is set.
pub struct SearchOrchestrator<H: WindowHost + 'static, S: Scheduler> {
    windows: Rc<RefCell<WindowManager<H>>>,
    scheduler: S,
    interval: Duration,
    cancel_previous: bool,
    generation: Rc<Cell<u64>>,
}

impl<H: WindowHost + 'static, S: Scheduler> SearchOrchestrator<H, S> {
    pub fn new(windows: WindowManager<H>, scheduler: S, interval: Duration) -> Self {
        Self {
            windows: Rc::new(RefCell::new(windows)),
            scheduler,
            interval,
            cancel_previous: true,
            generation: Rc::new(Cell::new(0)),
        }
    }

    pub fn with_cancel_previous(mut self, cancel_previous: bool) -> Self {
        self.cancel_previous = cancel_previous;
        self
    }

    pub fn windows(&self) -> &Rc<RefCell<WindowManager<H>>> {
        &self.windows
    }

    /// Search every selected source, in registry order, one interval apart.
    /// Returns the number of scheduled displays.
    pub fn search_all<K: KeyValueStore>(&self, query: &str, catalog: &Catalog<K>) -> usize {
        if query.trim().is_empty() {
            return 0;
        }

        let generation = if self.cancel_previous {
            self.cancel_pending()
        } else {
            self.generation.get()
        };

        let selected = catalog.selected_sources();
        log::info!("Searching {} sources for '{}'", selected.len(), query);

        for (index, source) in selected.iter().enumerate() {
            let delay = stagger_delay(index, self.interval);
            let source = (*source).clone();
            let query = query.to_string();
            let windows = Rc::clone(&self.windows);
            let current = Rc::clone(&self.generation);

            self.scheduler.schedule(
                delay,
                Box::new(move || {
                    if current.get() != generation {
                        log::debug!("Skipping stale display for '{}'", source.id);
                        return;
                    }
                    windows.borrow_mut().display(&source, &query);
                }),
            );
        }

        selected.len()
    }

    /// Search one source immediately. Only an empty query is skipped.
    pub fn search_one(&self, source: &SearchSource, query: &str) -> bool {
        if query.is_empty() {
            return false;
        }
        self.windows.borrow_mut().display(source, query);
        true
    }

    /// Invalidate every display still waiting to run. Returns the new generation.
    pub fn cancel_pending(&self) -> u64 {
        let next = self.generation.get().wrapping_add(1);
        self.generation.set(next);
        next
    }

    /// Drop pending displays and close every tracked window
    pub fn teardown(&self) -> usize {
        self.cancel_pending();
        self.windows.borrow_mut().teardown_all()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ManualScheduler;
    use super::*;
    use crate::source::{Category, SourceDraft};
    use crate::storage::MemoryStore;
    use crate::window_manager::testing::RecordingHost;

    const INTERVAL: Duration = Duration::from_millis(100);

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

    fn catalog() -> Catalog<MemoryStore> {
        Catalog::restore_with(
            MemoryStore::new(),
            vec![builtin("google"), builtin("bing"), builtin("pubmed")],
        )
    }

    fn setup() -> (
        SearchOrchestrator<RecordingHost, ManualScheduler>,
        ManualScheduler,
        Rc<RefCell<Vec<(String, String, String)>>>,
    ) {
        let host = RecordingHost::new();
        let opened = host.fake.opened.clone();
        let scheduler = ManualScheduler::default();
        let orchestrator = SearchOrchestrator::new(WindowManager::new(host), scheduler.clone(), INTERVAL);
        (orchestrator, scheduler, opened)
    }

    #[test]
    fn test_stagger_delays_increase() {
        let (orchestrator, scheduler, opened) = setup();
        let mut catalog = catalog();
        catalog.toggle_selection("bing");
        let id = catalog.add_custom_source(SourceDraft::new("X", "https://x.com/?q=")).unwrap();

        assert_eq!(orchestrator.search_all("rust", &catalog), 3);
        assert_eq!(
            scheduler.delays(),
            vec![Duration::ZERO, INTERVAL, INTERVAL * 2]
        );
        assert!(opened.borrow().is_empty());

        scheduler.run_all();
        let names: Vec<String> = opened.borrow().iter().map(|(_, name, _)| name.clone()).collect();
        assert_eq!(
            names,
            vec![
                "multiseek-google".to_string(),
                "multiseek-pubmed".to_string(),
                format!("multiseek-{}", id),
            ]
        );
    }

    #[test]
    fn test_blank_query_schedules_nothing() {
        let (orchestrator, scheduler, opened) = setup();
        let catalog = catalog();

        assert_eq!(orchestrator.search_all("", &catalog), 0);
        assert_eq!(orchestrator.search_all("   \t", &catalog), 0);
        assert!(!orchestrator.search_one(&builtin("google"), ""));
        assert!(scheduler.delays().is_empty());
        assert!(opened.borrow().is_empty());
    }

    #[test]
    fn test_search_one_is_immediate() {
        let (orchestrator, scheduler, opened) = setup();

        assert!(orchestrator.search_one(&builtin("google"), "hello world"));
        assert!(scheduler.delays().is_empty());
        assert_eq!(opened.borrow().len(), 1);
        assert_eq!(opened.borrow()[0].0, "https://google.example/?q=hello%20world");
    }

    #[test]
    fn test_query_whitespace_is_encoded_verbatim() {
        let (orchestrator, scheduler, opened) = setup();
        let catalog = catalog();

        assert!(orchestrator.search_one(&builtin("google"), "  hello world "));
        assert_eq!(
            opened.borrow()[0].0,
            "https://google.example/?q=%20%20hello%20world%20"
        );

        assert!(orchestrator.search_one(&builtin("bing"), " "));
        assert_eq!(opened.borrow()[1].0, "https://bing.example/?q=%20");

        orchestrator.search_all(" rust ", &catalog);
        scheduler.run_all();
        assert_eq!(
            opened.borrow().last().map(|(url, _, _)| url.as_str()),
            Some("https://pubmed.example/?q=%20rust%20")
        );
    }

    #[test]
    fn test_repeat_search_reuses_windows() {
        let (orchestrator, scheduler, opened) = setup();
        let catalog = catalog();

        orchestrator.search_all("first", &catalog);
        scheduler.run_all();
        orchestrator.search_all("second", &catalog);
        scheduler.run_all();

        assert_eq!(opened.borrow().len(), 3);
        assert_eq!(orchestrator.windows().borrow().live_count(), 3);
    }

    #[test]
    fn test_new_search_cancels_pending_one() {
        let (orchestrator, scheduler, opened) = setup();
        let catalog = catalog();

        orchestrator.search_all("stale", &catalog);
        orchestrator.search_all("fresh", &catalog);
        scheduler.run_all();

        let urls: Vec<String> = opened.borrow().iter().map(|(url, _, _)| url.clone()).collect();
        assert_eq!(urls.len(), 3);
        assert!(urls.iter().all(|url| url.ends_with("fresh")));
    }

    #[test]
    fn test_pending_searches_survive_without_cancellation() {
        let (orchestrator, scheduler, opened) = setup();
        let orchestrator = orchestrator.with_cancel_previous(false);
        let catalog = catalog();

        orchestrator.search_all("stale", &catalog);
        orchestrator.search_all("fresh", &catalog);
        scheduler.run_all();

        // Second round navigates the windows the first one opened
        assert_eq!(opened.borrow().len(), 3);
        assert!(opened.borrow().iter().all(|(url, _, _)| url.ends_with("stale")));
    }

    #[test]
    fn test_teardown_cancels_and_closes() {
        let (orchestrator, scheduler, opened) = setup();
        let catalog = catalog();

        orchestrator.search_one(&builtin("google"), "q");
        orchestrator.search_all("q", &catalog);
        assert_eq!(orchestrator.teardown(), 1);

        scheduler.run_all();
        assert_eq!(opened.borrow().len(), 1);
        assert_eq!(orchestrator.windows().borrow().live_count(), 0);
    }

    #[test]
    fn test_stagger_delay_saturates() {
        assert_eq!(stagger_delay(0, INTERVAL), Duration::ZERO);
        assert_eq!(stagger_delay(3, INTERVAL), Duration::from_millis(300));
    }
}
