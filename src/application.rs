use crate::catalog::Catalog;
use crate::config;
use crate::search::{GlibScheduler, SearchOrchestrator};
use crate::settings::AppSettings;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::webview::{self, WebViewHost};
use crate::window::MainWindow;
use crate::window_manager::WindowManager;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{gio, glib};
use libadwaita::subclass::prelude::*;
use libadwaita::prelude::AdwDialogExt;
use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

/// Catalog shared between the application and its main window
pub type SharedCatalog = Rc<RefCell<Catalog<Box<dyn KeyValueStore>>>>;

/// Orchestrator driving WebKit result windows on the GLib main loop
pub type Orchestrator = SearchOrchestrator<WebViewHost, GlibScheduler>;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct MultiseekApplication {
        pub catalog: OnceCell<SharedCatalog>,
        pub orchestrator: OnceCell<Rc<Orchestrator>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for MultiseekApplication {
        const NAME: &'static str = "MultiseekApplication";
        type Type = super::MultiseekApplication;
        type ParentType = libadwaita::Application;
    }

    impl ObjectImpl for MultiseekApplication {}

    impl ApplicationImpl for MultiseekApplication {
        fn activate(&self) {
            let app = self.obj();

            let existing = app
                .windows()
                .into_iter()
                .find_map(|w| w.downcast::<MainWindow>().ok());
            if let Some(window) = existing {
                window.present();
                return;
            }

            let window = MainWindow::new(&app);
            window.present();
        }

        fn startup(&self) {
            self.parent_startup();

            let app = self.obj();
            app.initialize();
            app.setup_actions();
            app.setup_accels();
        }

        fn shutdown(&self) {
            if let Some(orchestrator) = self.orchestrator.get() {
                orchestrator.teardown();
            }

            self.parent_shutdown();
        }
    }

    impl GtkApplicationImpl for MultiseekApplication {}
    impl AdwApplicationImpl for MultiseekApplication {}
}

glib::wrapper! {
    pub struct MultiseekApplication(ObjectSubclass<imp::MultiseekApplication>)
        @extends libadwaita::Application, gtk4::Application, gio::Application,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl MultiseekApplication {
    pub fn new() -> Self {
        glib::Object::builder()
            .property("application-id", config::APP_ID)
            .property("flags", gio::ApplicationFlags::empty())
            .build()
    }

    pub fn catalog(&self) -> Option<SharedCatalog> {
        self.imp().catalog.get().cloned()
    }

    pub fn orchestrator(&self) -> Option<Rc<Orchestrator>> {
        self.imp().orchestrator.get().cloned()
    }

    /// Load settings, restore the catalog and build the orchestrator
    fn initialize(&self) {
        let imp = self.imp();
        let settings = AppSettings::load();

        let store: Box<dyn KeyValueStore> = match FileStore::open_default() {
            Ok(store) => {
                log::info!("Using store {:?}", store.path());
                Box::new(store)
            }
            Err(e) => {
                log::error!("Failed to open store, selections will not be saved: {}", e);
                Box::new(MemoryStore::new())
            }
        };
        let catalog = Rc::new(RefCell::new(Catalog::restore(store)));

        let host = WebViewHost::new(
            self,
            webview::create_network_session(),
            settings.result_window_width,
            settings.result_window_height,
        );
        let windows = WindowManager::new(host).with_url_mode(settings.url_template_mode);
        let orchestrator = SearchOrchestrator::new(windows, GlibScheduler, settings.stagger_interval())
            .with_cancel_previous(settings.cancel_previous_search);

        if imp.catalog.set(catalog).is_err() {
            log::warn!("Catalog already initialized");
        }
        if imp.orchestrator.set(Rc::new(orchestrator)).is_err() {
            log::warn!("Orchestrator already initialized");
        }
    }

    fn setup_actions(&self) {
        let quit_action = gio::SimpleAction::new("quit", None);
        quit_action.connect_activate(glib::clone!(
            #[weak(rename_to = app)]
            self,
            move |_, _| {
                app.quit();
            }
        ));
        self.add_action(&quit_action);

        let about_action = gio::SimpleAction::new("about", None);
        about_action.connect_activate(glib::clone!(
            #[weak(rename_to = app)]
            self,
            move |_, _| {
                app.show_about();
            }
        ));
        self.add_action(&about_action);

        // Close every result window but keep the main window
        let close_results_action = gio::SimpleAction::new("close-results", None);
        close_results_action.connect_activate(glib::clone!(
            #[weak(rename_to = app)]
            self,
            move |_, _| {
                if let Some(orchestrator) = app.orchestrator() {
                    orchestrator.teardown();
                }
            }
        ));
        self.add_action(&close_results_action);
    }

    fn setup_accels(&self) {
        self.set_accels_for_action("app.quit", &["<Control>q"]);
        self.set_accels_for_action("app.close-results", &["<Control><Shift>w"]);
        self.set_accels_for_action("win.focus-query", &["<Control>l"]);
    }

    fn show_about(&self) {
        let about = libadwaita::AboutDialog::builder()
            .application_name(config::APP_NAME)
            .version(config::APP_VERSION)
            .application_icon(config::APP_ID)
            .developer_name("myyc")
            .license_type(gtk4::License::Gpl30)
            .website("https://github.com/myyc/multiseek")
            .comments("One query, many search engines")
            .build();

        if let Some(window) = self.active_window() {
            about.present(Some(&window));
        }
    }
}

impl Default for MultiseekApplication {
    fn default() -> Self {
        Self::new()
    }
}
