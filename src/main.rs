mod client;
mod clipboard;
mod config;
mod controller;
mod export;
mod gui;
mod notify;
mod opener;
mod render;

use clap::Parser;
use config::{Args, Config};
use eframe::NativeOptions;
use gui::RevwhoixApp;
use log::info;

fn main() -> Result<(), eframe::Error> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();

    let config = Config::from(args);
    info!(
        "Starting revwhoix against {} ({} example keywords)",
        config.endpoint,
        config.examples.len()
    );

    let options = NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "revwhoix",
        options,
        Box::new(move |cc| Ok(Box::new(RevwhoixApp::new(cc, config)))),
    )
}
