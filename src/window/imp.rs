use super::source_row::SourceRow;
use crate::application::{Orchestrator, SharedCatalog};
use crate::config;
use crate::source::{Category, SourceDraft};
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{gio, glib};
use libadwaita::prelude::*;
use libadwaita::subclass::prelude::*;
use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

/// Widgets the window updates after construction
pub struct Widgets {
    pub toast_overlay: libadwaita::ToastOverlay,
    pub query_entry: gtk4::SearchEntry,
    pub search_button: gtk4::Button,
    pub status_label: gtk4::Label,
    /// One heading and list per category
    pub source_lists: Vec<(Category, gtk4::Label, gtk4::ListBox)>,
    pub name_row: libadwaita::EntryRow,
    pub url_row: libadwaita::EntryRow,
    pub description_row: libadwaita::EntryRow,
    pub category_row: libadwaita::ComboRow,
}

#[derive(Default)]
pub struct MainWindow {
    pub widgets: OnceCell<Widgets>,
    pub catalog: RefCell<Option<SharedCatalog>>,
    pub orchestrator: RefCell<Option<Rc<Orchestrator>>>,
}

#[glib::object_subclass]
impl ObjectSubclass for MainWindow {
    const NAME: &'static str = "MultiseekMainWindow";
    type Type = super::MainWindow;
    type ParentType = libadwaita::ApplicationWindow;
}

impl ObjectImpl for MainWindow {
    fn constructed(&self) {
        self.parent_constructed();

        let obj = self.obj();
        obj.set_title(Some(config::APP_NAME));
        obj.set_default_size(config::MAIN_WINDOW_WIDTH, config::MAIN_WINDOW_HEIGHT);

        let action_focus_query = gio::ActionEntry::builder("focus-query")
            .activate(|window: &super::MainWindow, _, _| {
                window.imp().focus_query();
            })
            .build();
        obj.add_action_entries([action_focus_query]);

        let widgets = self.build_ui();
        self.connect_signals(&widgets);
        if self.widgets.set(widgets).is_err() {
            log::warn!("Main window widgets already built");
        }
    }
}

impl WidgetImpl for MainWindow {}

impl WindowImpl for MainWindow {
    // Result windows do not outlive the main window
    fn close_request(&self) -> glib::Propagation {
        if let Some(orchestrator) = self.orchestrator() {
            orchestrator.teardown();
        }
        self.parent_close_request()
    }
}

impl ApplicationWindowImpl for MainWindow {}
impl AdwApplicationWindowImpl for MainWindow {}

impl MainWindow {
    fn build_ui(&self) -> Widgets {
        let obj = self.obj();

        let header = libadwaita::HeaderBar::new();
        let menu = gio::Menu::new();
        menu.append(Some("Close All Results"), Some("app.close-results"));
        menu.append(Some("About"), Some("app.about"));
        menu.append(Some("Quit"), Some("app.quit"));
        let menu_button = gtk4::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu)
            .tooltip_text("Main Menu")
            .build();
        header.pack_end(&menu_button);

        let content = gtk4::Box::new(gtk4::Orientation::Vertical, 12);
        content.set_margin_start(12);
        content.set_margin_end(12);
        content.set_margin_top(12);
        content.set_margin_bottom(12);

        // Query
        let query_box = gtk4::Box::new(gtk4::Orientation::Horizontal, 6);
        let query_entry = gtk4::SearchEntry::builder()
            .placeholder_text("Search selected sources")
            .hexpand(true)
            .build();
        let search_button = gtk4::Button::with_label("Search Selected");
        search_button.add_css_class("suggested-action");
        query_box.append(&query_entry);
        query_box.append(&search_button);
        content.append(&query_box);

        let status_label = gtk4::Label::new(None);
        status_label.set_halign(gtk4::Align::Start);
        status_label.add_css_class("dim-label");
        status_label.add_css_class("caption");
        content.append(&status_label);

        // Sources, grouped by category
        let mut source_lists = Vec::new();
        for category in Category::ALL {
            let heading = gtk4::Label::new(Some(category.label()));
            heading.set_halign(gtk4::Align::Start);
            heading.add_css_class("heading");

            let list = gtk4::ListBox::new();
            list.set_selection_mode(gtk4::SelectionMode::None);
            list.add_css_class("boxed-list");

            content.append(&heading);
            content.append(&list);
            source_lists.push((category, heading, list));
        }

        // Add-source form
        let form_heading = gtk4::Label::new(Some("Add Source"));
        form_heading.set_halign(gtk4::Align::Start);
        form_heading.add_css_class("heading");
        content.append(&form_heading);

        let form = gtk4::ListBox::new();
        form.set_selection_mode(gtk4::SelectionMode::None);
        form.add_css_class("boxed-list");

        let name_row = libadwaita::EntryRow::builder().title("Name").build();
        let url_row = libadwaita::EntryRow::builder()
            .title("URL template, the query is appended")
            .build();
        let description_row = libadwaita::EntryRow::builder().title("Description").build();
        let category_labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        let category_row = libadwaita::ComboRow::builder()
            .title("Category")
            .model(&gtk4::StringList::new(&category_labels))
            .build();
        form.append(&name_row);
        form.append(&url_row);
        form.append(&description_row);
        form.append(&category_row);
        content.append(&form);

        let add_button = gtk4::Button::with_label("Add Source");
        add_button.set_halign(gtk4::Align::End);
        add_button.set_action_name(Some("win.add-source"));
        content.append(&add_button);

        let clamp = libadwaita::Clamp::builder()
            .maximum_size(640)
            .child(&content)
            .build();
        let scrolled = gtk4::ScrolledWindow::builder()
            .hscrollbar_policy(gtk4::PolicyType::Never)
            .vexpand(true)
            .child(&clamp)
            .build();

        let toolbar_view = libadwaita::ToolbarView::new();
        toolbar_view.add_top_bar(&header);
        toolbar_view.set_content(Some(&scrolled));

        let toast_overlay = libadwaita::ToastOverlay::new();
        toast_overlay.set_child(Some(&toolbar_view));
        obj.set_content(Some(&toast_overlay));

        Widgets {
            toast_overlay,
            query_entry,
            search_button,
            status_label,
            source_lists,
            name_row,
            url_row,
            description_row,
            category_row,
        }
    }

    fn connect_signals(&self, widgets: &Widgets) {
        let obj = self.obj();

        let action_add_source = gio::ActionEntry::builder("add-source")
            .activate(|window: &super::MainWindow, _, _| {
                window.imp().add_source();
            })
            .build();
        obj.add_action_entries([action_add_source]);

        let window_weak = obj.downgrade();
        widgets.search_button.connect_clicked(move |_| {
            if let Some(window) = window_weak.upgrade() {
                window.imp().search_selected();
            }
        });

        let window_weak = obj.downgrade();
        widgets.query_entry.connect_activate(move |_| {
            if let Some(window) = window_weak.upgrade() {
                window.imp().search_selected();
            }
        });
    }

    /// Attach shared state and populate the source lists
    pub fn bind(&self, catalog: SharedCatalog, orchestrator: Rc<Orchestrator>) {
        *self.catalog.borrow_mut() = Some(catalog);
        *self.orchestrator.borrow_mut() = Some(orchestrator);
        self.refresh_sources();
    }

    fn catalog(&self) -> Option<SharedCatalog> {
        self.catalog.borrow().clone()
    }

    fn orchestrator(&self) -> Option<Rc<Orchestrator>> {
        self.orchestrator.borrow().clone()
    }

    fn query(&self) -> String {
        self.widgets
            .get()
            .map(|w| w.query_entry.text().to_string())
            .unwrap_or_default()
    }

    pub fn focus_query(&self) {
        if let Some(widgets) = self.widgets.get() {
            widgets.query_entry.grab_focus();
        }
    }

    fn search_selected(&self) {
        let (Some(catalog), Some(orchestrator)) = (self.catalog(), self.orchestrator()) else {
            return;
        };
        let query = self.query();
        let catalog = catalog.borrow();
        let scheduled = orchestrator.search_all(&query, &*catalog);

        if scheduled == 0 && !query.trim().is_empty() {
            self.show_toast("No sources selected");
        }
    }

    fn search_source(&self, source_id: &str) {
        let (Some(catalog), Some(orchestrator)) = (self.catalog(), self.orchestrator()) else {
            return;
        };
        let source = catalog.borrow().source(source_id).cloned();
        if let Some(source) = source {
            orchestrator.search_one(&source, &self.query());
        }
    }

    fn toggle_source(&self, source_id: &str, active: bool) {
        let Some(catalog) = self.catalog() else {
            return;
        };
        let selected = catalog.borrow_mut().toggle_selection(source_id);
        if selected != active {
            log::warn!("Selection for '{}' out of sync with its checkbox", source_id);
        }
        self.update_status();
    }

    fn delete_source(&self, source_id: &str) {
        let Some(catalog) = self.catalog() else {
            return;
        };
        let name = catalog.borrow().source(source_id).map(|s| s.name.clone());
        if !catalog.borrow_mut().delete_custom_source(source_id) {
            return;
        }

        // The clicked row is rebuilt, so refresh outside its handler
        let window_weak = self.obj().downgrade();
        glib::idle_add_local_once(move || {
            if let Some(window) = window_weak.upgrade() {
                window.imp().refresh_sources();
            }
        });

        if let Some(name) = name {
            self.show_toast(&format!("Deleted “{}”", name));
        }
    }

    fn add_source(&self) {
        let (Some(widgets), Some(catalog)) = (self.widgets.get(), self.catalog()) else {
            return;
        };

        let draft = SourceDraft {
            id: None,
            name: widgets.name_row.text().to_string(),
            url_template: widgets.url_row.text().to_string(),
            description: widgets.description_row.text().to_string(),
            category: Category::from_index(widgets.category_row.selected() as usize),
        };
        let name = draft.name.trim().to_string();

        let added = catalog.borrow_mut().add_custom_source(draft);
        if added.is_none() {
            widgets.name_row.grab_focus();
            return;
        }

        widgets.name_row.set_text("");
        widgets.url_row.set_text("");
        widgets.description_row.set_text("");
        self.refresh_sources();
        self.show_toast(&format!("Added “{}”", name));
    }

    /// Rebuild every source list from the catalog
    fn refresh_sources(&self) {
        let (Some(widgets), Some(catalog)) = (self.widgets.get(), self.catalog()) else {
            return;
        };

        {
            let catalog = catalog.borrow();
            for (category, heading, list) in &widgets.source_lists {
                list.remove_all();
                let mut count = 0;
                for source in catalog.sources().filter(|s| s.category == *category) {
                    let row = SourceRow::new(source, catalog.is_selected(&source.id));
                    self.connect_row(&row);
                    list.append(&row);
                    count += 1;
                }
                heading.set_visible(count > 0);
                list.set_visible(count > 0);
            }
        }

        self.update_status();
    }

    fn connect_row(&self, row: &SourceRow) {
        let window_weak = self.obj().downgrade();
        row.connect_toggled(move |row, active| {
            if let Some(window) = window_weak.upgrade() {
                window.imp().toggle_source(&row.source_id(), active);
            }
        });

        let window_weak = self.obj().downgrade();
        row.connect_search_clicked(move |row| {
            if let Some(window) = window_weak.upgrade() {
                window.imp().search_source(&row.source_id());
            }
        });

        let window_weak = self.obj().downgrade();
        row.connect_delete_clicked(move |row| {
            if let Some(window) = window_weak.upgrade() {
                window.imp().delete_source(&row.source_id());
            }
        });
    }

    fn update_status(&self) {
        let (Some(widgets), Some(catalog)) = (self.widgets.get(), self.catalog()) else {
            return;
        };
        let catalog = catalog.borrow();
        let selected = catalog.selected_sources().len();
        let total = catalog.registry().len();

        widgets
            .status_label
            .set_text(&format!("{} of {} sources selected", selected, total));
        widgets.search_button.set_sensitive(selected > 0);
    }

    fn show_toast(&self, message: &str) {
        if let Some(widgets) = self.widgets.get() {
            widgets.toast_overlay.add_toast(libadwaita::Toast::new(message));
        }
    }
}
