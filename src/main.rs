mod app;
mod audio;
mod catalog;
mod classify;
mod config;
mod logging;
mod mpris;
mod playback;
mod runtime;
mod stats;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
