use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::{App, Focus, Shortcut, View};
use crate::config;
use crate::search::{SearchTicket, SearchWorker};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// What the loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
    /// A search was accepted and its online half must be dispatched.
    Search(SearchTicket),
}

/// Main terminal event loop: feeds media and search results into the model,
/// draws, and maps keys. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    search: &SearchWorker,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(settings.audio.tick_ms.clamp(16, 250));
    loop {
        app.sync_media();
        for outcome in search.drain() {
            app.finish_search(outcome);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key_event(key, settings, app, state) {
                    KeyOutcome::Continue => {}
                    KeyOutcome::Quit => break,
                    KeyOutcome::Search(ticket) => search.dispatch(ticket),
                }
            }
        }
    }

    Ok(())
}

pub fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    state: &mut EventLoopState,
) -> KeyOutcome {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyOutcome::Quit;
    }

    match app.focus {
        Focus::SearchInput => {
            state.pending_gg = false;
            match key.code {
                KeyCode::Esc => app.cancel_input(),
                KeyCode::Enter => {
                    if let Some(ticket) = app.submit_search() {
                        return KeyOutcome::Search(ticket);
                    }
                }
                KeyCode::Backspace => app.pop_char(),
                KeyCode::Up => app.recall_recent(true),
                KeyCode::Down => app.recall_recent(false),
                KeyCode::Char(c) if !c.is_control() => app.push_char(c),
                _ => {}
            }
            return KeyOutcome::Continue;
        }
        Focus::UploadPrompt => {
            state.pending_gg = false;
            match key.code {
                KeyCode::Esc => app.cancel_input(),
                KeyCode::Enter => app.confirm_upload(),
                KeyCode::Backspace => app.pop_char(),
                KeyCode::Char(c) if !c.is_control() => app.push_char(c),
                _ => {}
            }
            return KeyOutcome::Continue;
        }
        Focus::Browse => {}
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }
    app.dismiss_notice();

    match key.code {
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Char('/') => app.focus_search(),
        KeyCode::Char('r') => {
            app.focus_search();
            app.recall_recent(true);
        }
        KeyCode::Char('u') => app.focus_upload(),
        KeyCode::Char('1') => app.set_view(View::Home),
        KeyCode::Char('2') => app.set_view(View::Library),
        KeyCode::Char('3') => app.set_view(View::Playlist),
        KeyCode::Char('4') => app.set_view(View::Search),
        KeyCode::Tab => app.cycle_view(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.cursor_top();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.cursor_bottom(),
        KeyCode::Char('j') => app.cursor_down(),
        KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Enter => app.activate_selected(),
        KeyCode::Char('a') => app.toggle_playlist_selected(),
        KeyCode::Char('d') => app.remove_selected_from_library(),
        KeyCode::Char('c') => app.clear_recent_searches(),
        KeyCode::Char('L') => app.scrub(settings.controls.scrub_seconds as f64),
        KeyCode::Char('H') => app.scrub(-(settings.controls.scrub_seconds as f64)),
        KeyCode::Char(' ') => shortcut(app, Shortcut::TogglePlayPause),
        KeyCode::Right => shortcut(app, Shortcut::Next),
        KeyCode::Left => shortcut(app, Shortcut::Previous),
        KeyCode::Up => shortcut(app, Shortcut::VolumeUp),
        KeyCode::Down => shortcut(app, Shortcut::VolumeDown),
        _ => {}
    }

    KeyOutcome::Continue
}

fn shortcut(app: &mut App, shortcut: Shortcut) {
    if !app.apply_shortcut(shortcut) {
        debug!(?shortcut, "shortcut ignored, nothing selected");
    }
}
