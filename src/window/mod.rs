mod imp;
mod source_row;

use crate::application::MultiseekApplication;
use gtk4::subclass::prelude::*;
use gtk4::{gio, glib};

glib::wrapper! {
    pub struct MainWindow(ObjectSubclass<imp::MainWindow>)
        @extends libadwaita::ApplicationWindow, gtk4::ApplicationWindow, gtk4::Window, gtk4::Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget, gtk4::Native, gtk4::Root, gtk4::ShortcutManager, gio::ActionGroup, gio::ActionMap;
}

impl MainWindow {
    /// Create the main window and fill it from the application's catalog
    pub fn new(app: &MultiseekApplication) -> Self {
        let window: Self = glib::Object::builder()
            .property("application", app)
            .build();

        match (app.catalog(), app.orchestrator()) {
            (Some(catalog), Some(orchestrator)) => window.imp().bind(catalog, orchestrator),
            _ => log::error!("Application not initialized, source list unavailable"),
        }

        window
    }
}
