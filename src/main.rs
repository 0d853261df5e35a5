use gtk4::prelude::*;
use multiseek::application::MultiseekApplication;
use multiseek::config;

fn main() -> glib::ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}", config::APP_NAME, config::APP_VERSION);

    let app = MultiseekApplication::new();
    app.run()
}
