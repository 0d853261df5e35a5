//! Result windows: one WebKit view per window, opened through [`WebViewHost`].

use crate::storage;
use crate::window_manager::{prune_closed, WindowFeatures, WindowHandle, WindowHost};
use gtk4::glib;
use gtk4::prelude::*;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use url::Url;
use webkit6::prelude::WebViewExt as WebKitWebViewExt;
use webkit6::NetworkSession;

/// Network session shared by all result windows, persisted in the XDG dirs
pub fn create_network_session() -> NetworkSession {
    match (storage::data_dir(), storage::cache_dir()) {
        (Some(data_dir), Some(cache_dir)) => {
            let data_dir = data_dir.join("web");
            let cache_dir = cache_dir.join("web");
            log::info!(
                "Network session created with data={:?}, cache={:?}",
                data_dir,
                cache_dir
            );
            NetworkSession::new(data_dir.to_str(), cache_dir.to_str())
        }
        _ => {
            log::warn!("No data directories, using an ephemeral network session");
            NetworkSession::new_ephemeral()
        }
    }
}

/// Create a new WebKitWebView for a result window
pub fn create_webview(network_session: &NetworkSession) -> webkit6::WebView {
    let settings = webkit6::Settings::new();

    // === Security Settings ===
    // Block automatic popups (require user interaction)
    settings.set_javascript_can_open_windows_automatically(false);

    // Block clipboard access by default (privacy)
    settings.set_javascript_can_access_clipboard(false);

    // Block data: URL navigation (phishing/scam prevention)
    settings.set_allow_top_navigation_to_data_urls(false);

    // Restrict file:// URL access (security)
    settings.set_allow_file_access_from_file_urls(false);
    settings.set_allow_universal_access_from_file_urls(false);

    settings.set_enable_javascript(true);
    settings.set_enable_page_cache(true);
    settings.set_enable_smooth_scrolling(false);

    settings.set_user_agent_with_application_details(
        Some(crate::config::APP_NAME),
        Some(crate::config::APP_VERSION),
    );

    let webview = webkit6::WebView::builder()
        .settings(&settings)
        .network_session(network_session)
        .build();

    webview.set_hexpand(true);
    webview.set_vexpand(true);

    webview
}

/// A top-level window showing one source's results
#[derive(Clone)]
pub struct ResultWindow {
    window: libadwaita::ApplicationWindow,
    webview: webkit6::WebView,
    closed: Rc<Cell<bool>>,
}

impl ResultWindow {
    fn new(
        app: &gtk4::Application,
        network_session: &NetworkSession,
        name: &str,
        width: i32,
        height: i32,
    ) -> Self {
        let webview = create_webview(network_session);

        let header = libadwaita::HeaderBar::new();
        let toolbar_view = libadwaita::ToolbarView::new();
        toolbar_view.add_top_bar(&header);
        toolbar_view.set_content(Some(&webview));

        let window = libadwaita::ApplicationWindow::builder()
            .application(app)
            .title(name)
            .default_width(width)
            .default_height(height)
            .content(&toolbar_view)
            .build();

        let closed = Rc::new(Cell::new(false));
        let closed_flag = Rc::clone(&closed);
        window.connect_close_request(move |_| {
            closed_flag.set(true);
            glib::Propagation::Proceed
        });

        // Window title follows the page title
        let window_weak = window.downgrade();
        webview.connect_notify_local(Some("title"), move |wv, _| {
            let Some(window) = window_weak.upgrade() else {
                return;
            };
            if let Some(title) = wv.title().filter(|t| !t.is_empty()) {
                window.set_title(Some(title.as_str()));
            }
        });

        Self {
            window,
            webview,
            closed,
        }
    }
}

impl WindowHandle for ResultWindow {
    fn is_closed(&self) -> bool {
        self.closed.get()
    }

    fn focus(&self) {
        self.window.present();
    }

    fn replace_location(&self, url: &str) {
        self.webview.load_uri(url);
    }

    fn close(&self) {
        if !self.closed.replace(true) {
            self.window.close();
        }
    }
}

/// Opens result windows inside the application.
///
/// Windows are also registered under their name, so a second open with the
/// same name navigates the existing window instead of creating another one.
pub struct WebViewHost {
    app: glib::WeakRef<gtk4::Application>,
    network_session: NetworkSession,
    named: RefCell<HashMap<String, ResultWindow>>,
    width: i32,
    height: i32,
}

impl WebViewHost {
    pub fn new(
        app: &impl IsA<gtk4::Application>,
        network_session: NetworkSession,
        width: i32,
        height: i32,
    ) -> Self {
        Self {
            app: app.upcast_ref::<gtk4::Application>().downgrade(),
            network_session,
            named: RefCell::new(HashMap::new()),
            width,
            height,
        }
    }
}

impl WindowHost for WebViewHost {
    type Handle = ResultWindow;

    fn open(&self, url: &str, name: &str, features: &str) -> Option<ResultWindow> {
        let url = match Url::parse(url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            Ok(url) => {
                log::warn!("Refusing to open '{}' URL in window '{}'", url.scheme(), name);
                return None;
            }
            Err(e) => {
                log::warn!("Refusing to open invalid URL '{}': {}", url, e);
                return None;
            }
        };

        let pruned = prune_closed(&mut self.named.borrow_mut());
        if pruned > 0 {
            log::debug!("Released {} closed result windows", pruned);
        }

        if let Some(existing) = self.named.borrow().get(name) {
            log::debug!("Window '{}' already open, navigating in place", name);
            existing.replace_location(url.as_str());
            return Some(existing.clone());
        }

        let Some(app) = self.app.upgrade() else {
            log::warn!("Application gone, cannot open window '{}'", name);
            return None;
        };

        // A fresh view with no related view has no opener, and load_uri sends no referrer
        let features = WindowFeatures::parse(features);
        if !features.noopener || !features.noreferrer {
            log::debug!("Result windows are always isolated, ignoring {:?}", features);
        }

        let window = ResultWindow::new(&app, &self.network_session, name, self.width, self.height);
        window.webview.load_uri(url.as_str());
        self.named.borrow_mut().insert(name.to_string(), window.clone());
        Some(window)
    }
}
