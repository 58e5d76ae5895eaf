mod app;
mod audio;
mod catalog;
mod config;
mod format;
mod library;
mod logging;
mod runtime;
mod search;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
