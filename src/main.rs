mod app;
mod config;
mod content;
mod controller;
mod error;
mod gst_logger;
mod loader;
mod media;
mod message;
mod state;
mod ui;

use config::Config;
use state::App;

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load();
    log::info!(
        "Starting {} (video={:?}, degenerate_range={:?})",
        config.title,
        config.video,
        config.degenerate_range
    );

    iced::application(move || App::boot(config.clone()), App::update, App::view)
        .title(App::title)
        .subscription(App::subscription)
        .run()
}
