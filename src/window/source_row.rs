use crate::source::SearchSource;
use gtk4::glib;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use std::cell::RefCell;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct SourceRow {
        pub source_id: RefCell<String>,

        // Child widgets
        pub check_button: RefCell<Option<gtk4::CheckButton>>,
        pub name_label: RefCell<Option<gtk4::Label>>,
        pub description_label: RefCell<Option<gtk4::Label>>,
        pub search_button: RefCell<Option<gtk4::Button>>,
        pub delete_button: RefCell<Option<gtk4::Button>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for SourceRow {
        const NAME: &'static str = "MultiseekSourceRow";
        type Type = super::SourceRow;
        type ParentType = gtk4::ListBoxRow;
    }

    impl ObjectImpl for SourceRow {
        fn constructed(&self) {
            self.parent_constructed();

            let obj = self.obj();
            obj.set_selectable(false);
            obj.set_activatable(false);

            let content_box = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
            content_box.set_margin_start(8);
            content_box.set_margin_end(8);
            content_box.set_margin_top(6);
            content_box.set_margin_bottom(6);
            obj.set_child(Some(&content_box));

            let check_button = gtk4::CheckButton::new();
            check_button.set_valign(gtk4::Align::Center);
            check_button.set_tooltip_text(Some("Include in multi-search"));
            content_box.append(&check_button);
            *self.check_button.borrow_mut() = Some(check_button);

            let text_box = gtk4::Box::new(gtk4::Orientation::Vertical, 2);
            text_box.set_hexpand(true);
            text_box.set_valign(gtk4::Align::Center);

            let name_label = gtk4::Label::new(None);
            name_label.set_halign(gtk4::Align::Start);
            name_label.set_ellipsize(gtk4::pango::EllipsizeMode::End);
            text_box.append(&name_label);
            *self.name_label.borrow_mut() = Some(name_label);

            let description_label = gtk4::Label::new(None);
            description_label.set_halign(gtk4::Align::Start);
            description_label.set_ellipsize(gtk4::pango::EllipsizeMode::End);
            description_label.add_css_class("dim-label");
            description_label.add_css_class("caption");
            text_box.append(&description_label);
            *self.description_label.borrow_mut() = Some(description_label);

            content_box.append(&text_box);

            let search_button = gtk4::Button::from_icon_name("system-search-symbolic");
            search_button.add_css_class("flat");
            search_button.set_valign(gtk4::Align::Center);
            search_button.set_tooltip_text(Some("Search Only This Source"));
            content_box.append(&search_button);
            *self.search_button.borrow_mut() = Some(search_button);

            // Only custom sources can be deleted
            let delete_button = gtk4::Button::from_icon_name("user-trash-symbolic");
            delete_button.add_css_class("flat");
            delete_button.add_css_class("error");
            delete_button.set_valign(gtk4::Align::Center);
            delete_button.set_tooltip_text(Some("Delete Source"));
            delete_button.set_visible(false);
            content_box.append(&delete_button);
            *self.delete_button.borrow_mut() = Some(delete_button);
        }
    }

    impl WidgetImpl for SourceRow {}
    impl ListBoxRowImpl for SourceRow {}
}

glib::wrapper! {
    pub struct SourceRow(ObjectSubclass<imp::SourceRow>)
        @extends gtk4::ListBoxRow, gtk4::Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget, gtk4::Actionable;
}

impl SourceRow {
    pub fn new(source: &SearchSource, selected: bool) -> Self {
        let obj: Self = glib::Object::new();
        let imp = obj.imp();

        *imp.source_id.borrow_mut() = source.id.clone();

        if let Some(label) = imp.name_label.borrow().as_ref() {
            label.set_text(&source.name);
        }
        if let Some(label) = imp.description_label.borrow().as_ref() {
            label.set_text(&source.description);
            label.set_visible(!source.description.is_empty());
        }
        if let Some(check) = imp.check_button.borrow().as_ref() {
            check.set_active(selected);
        }
        if let Some(button) = imp.delete_button.borrow().as_ref() {
            button.set_visible(source.is_custom);
        }
        obj.set_tooltip_text(Some(source.url_template.as_str()));

        obj
    }

    pub fn source_id(&self) -> String {
        self.imp().source_id.borrow().clone()
    }

    pub fn connect_toggled<F: Fn(&Self, bool) + 'static>(&self, f: F) {
        if let Some(check) = self.imp().check_button.borrow().as_ref() {
            let this = self.downgrade();
            check.connect_toggled(move |check| {
                if let Some(this) = this.upgrade() {
                    f(&this, check.is_active());
                }
            });
        }
    }

    pub fn connect_search_clicked<F: Fn(&Self) + 'static>(&self, f: F) {
        if let Some(button) = self.imp().search_button.borrow().as_ref() {
            let this = self.downgrade();
            button.connect_clicked(move |_| {
                if let Some(this) = this.upgrade() {
                    f(&this);
                }
            });
        }
    }

    pub fn connect_delete_clicked<F: Fn(&Self) + 'static>(&self, f: F) {
        if let Some(button) = self.imp().delete_button.borrow().as_ref() {
            let this = self.downgrade();
            button.connect_clicked(move |_| {
                if let Some(this) = this.upgrade() {
                    f(&this);
                }
            });
        }
    }
}

impl Default for SourceRow {
    fn default() -> Self {
        glib::Object::new()
    }
}
