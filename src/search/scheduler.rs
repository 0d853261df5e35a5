use gtk4::glib;
use std::time::Duration;

/// Runs a task after a delay on the UI thread
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// Schedules tasks on the default GLib main context
#[derive(Debug, Clone, Copy, Default)]
pub struct GlibScheduler;

impl Scheduler for GlibScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        glib::timeout_add_local_once(delay, task);
    }
}
