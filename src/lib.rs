pub mod application;
pub mod catalog;
pub mod config;
pub mod preferences;
pub mod search;
pub mod settings;
pub mod source;
pub mod storage;
pub mod webview;
pub mod window;
pub mod window_manager;
