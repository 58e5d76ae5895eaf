use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::catalog;
use crate::logging;
use crate::search::{ItunesLookup, SearchWorker};

mod event_loop;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    let _log_guard = logging::init(&settings.logging);
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    // Paths on the command line are the first upload batch.
    let initial_upload: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();

    let audio_player = AudioPlayer::new(settings.audio.clone());
    let mut app = App::new(
        catalog::load(&settings.catalog),
        Box::new(audio_player),
        &settings,
    );
    if !initial_upload.is_empty() {
        let added = app.upload(&initial_upload);
        app.notice = Some(if added == 0 {
            "No audio files found in the given paths".to_string()
        } else {
            format!("Added {added} tracks to your library")
        });
    }

    let search = SearchWorker::new(
        Arc::new(ItunesLookup::new(&settings.search)),
        settings.search.limit,
    );

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new();
        event_loop::run(&mut terminal, &settings, &mut app, &search, &mut state)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));
    info!("bye");

    run_result
}
