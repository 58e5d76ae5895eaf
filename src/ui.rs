//! UI rendering for the terminal user interface.
//!
//! Layout: header, sidebar (views and recent searches) beside the search box
//! and the active list, the player bar, and the controls footer.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Focus, View};
use crate::config::{ControlsSettings, UiSettings};
use crate::format::format_time;
use crate::library::Track;

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play"),
    ("space", "play/pause"),
    ("\u{2190}/\u{2192}", "prev/next"),
    ("\u{2191}/\u{2193}", "volume"),
    ("a", "playlist"),
    ("/", "search"),
    ("r", "recent"),
    ("u", "upload"),
    ("d", "remove"),
    ("c", "clear recent"),
    ("1-4/tab", "views"),
    ("q", "quit"),
];

const PAD_LEFT: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let mut parts: Vec<String> = CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect();
    parts.insert(6, format!("[H/L] scrub -/+{scrub_seconds}s"));
    parts.join(" | ")
}

/// One list row: playing marker, "artist - title", genre, length and a
/// playlist marker.
fn track_row(app: &App, track: &Track) -> String {
    let marker = if app.is_current(track) {
        if app.status().is_playing { "\u{25b6} " } else { "\u{23f8} " }
    } else {
        "  "
    };
    let mut row = format!("{marker}{}", track.display());
    if !track.genre.trim().is_empty() {
        row.push_str(&format!("  [{}]", track.genre));
    }
    if let Some(len) = &track.duration_label {
        row.push_str(&format!("  {len}"));
    }
    if app.coordinator.in_playlist(&track.id) {
        row.push_str("  \u{2665}");
    }
    row
}

fn list_title(app: &App) -> String {
    let len = app.visible_tracks().len();
    match app.view {
        View::Home => format!(" {} ({len}) ", app.catalog_title),
        View::Search if app.coordinator.is_searching() => " Searching... ".to_string(),
        view => format!(" {} ({len}) ", view.title()),
    }
}

fn empty_text(view: View) -> &'static str {
    match view {
        View::Home => "The catalog is empty.",
        View::Library => "No uploads yet. Press u to add files or a folder.",
        View::Playlist => "Your playlist is empty. Press a on a track to add it.",
        View::Search => "No results. Press / to search.",
    }
}

/// The newest `shown` recent searches, oldest first.
fn recent_window(recent: &[String], shown: usize) -> &[String] {
    &recent[recent.len().saturating_sub(shown)..]
}

/// Column of the text cursor after `text` inside a bordered box at `area`.
fn cursor_column(area: Rect, text: &str) -> u16 {
    let typed = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    let max_x = area.x.saturating_add(area.width.saturating_sub(2));
    area.x.saturating_add(1).saturating_add(typed).min(max_x)
}

fn draw_sidebar(frame: &mut Frame, app: &App, ui: &UiSettings, area: Rect) {
    let mut lines: Vec<Line> = View::ALL
        .iter()
        .map(|v| {
            let text = format!("{} {}", v.position() + 1, v.title());
            if *v == app.view {
                Line::from(text).add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Line::from(text)
            }
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from("Recent searches").add_modifier(Modifier::BOLD));
    let recent = app.coordinator.recent_searches();
    if recent.is_empty() {
        lines.push(Line::from("  none").dim());
    }
    for query in recent_window(recent, ui.recent_searches_shown) {
        lines.push(Line::from(format!("  {query}")));
    }

    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(PAD_LEFT)
            .title(" encore "),
    );
    frame.render_widget(sidebar, area);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let (title, text, editing) = match app.focus {
        Focus::UploadPrompt => (" upload: file or folder path ", app.upload_input.as_str(), true),
        Focus::SearchInput => (" search ", app.search_input.as_str(), true),
        Focus::Browse => (" search (/) ", app.search_input.as_str(), false),
    };
    let style = if editing {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    let input = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(input, area);

    if editing {
        frame.set_cursor_position((cursor_column(area, text), area.y + 1));
    }
}

fn draw_list(frame: &mut Frame, app: &App, area: Rect) {
    let tracks = app.visible_tracks();
    let block = Block::default().borders(Borders::ALL).title(list_title(app));
    if tracks.is_empty() {
        let empty = Paragraph::new(empty_text(app.view))
            .block(block.padding(PAD_LEFT))
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, area);
        return;
    }

    // Only build rows for the visible window, keeping the cursor centered.
    let total = tracks.len();
    let height = area.height.saturating_sub(2) as usize;
    let selected = app.selected().min(total - 1);
    let (start, end) = if total <= height || height == 0 {
        (0, total)
    } else {
        let half = height / 2;
        let mut start = selected.saturating_sub(half);
        if start + height > total {
            start = total - height;
        }
        (start, start + height)
    };

    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .map(|t| ListItem::new(track_row(app, t)))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(selected - start));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_player_bar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" now playing ");
    let Some(track) = app.current_track() else {
        let idle = Paragraph::new("Nothing playing").dim().block(block.padding(PAD_LEFT));
        frame.render_widget(idle, area);
        return;
    };
    let status = app.status();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let state = if status.is_playing { "Playing" } else { "Paused" };
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(track.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" \u{2022} {} \u{2022} {state}", track.artist)),
        Span::raw(format!(" \u{2022} Vol {:.0}%", status.volume * 100.0)),
    ]);
    frame.render_widget(Paragraph::new(line), rows[0]);

    let label = format!(
        "{} / {}",
        format_time(status.current_time),
        format_time(status.duration)
    );
    let ratio = if status.progress.is_finite() {
        (status.progress / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .ratio(ratio)
        .label(label)
        .gauge_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(gauge, rows[1]);
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, ui: &UiSettings, controls: &ControlsSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(4),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(20)])
        .split(chunks[1]);
    draw_sidebar(frame, app, ui, body[0]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(body[1]);
    draw_input(frame, app, main[0]);
    draw_list(frame, app, main[1]);

    draw_player_bar(frame, app, chunks[2]);

    let mut footer_text = controls_text(controls.scrub_seconds);
    if let Some(notice) = &app.notice {
        footer_text = format!("{notice}\n{footer_text}");
    }
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(PAD_LEFT),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_text_includes_scrub_seconds() {
        let text = controls_text(7);
        assert!(text.contains("[H/L] scrub -/+7s"));
        assert!(text.starts_with("[j/k] up/down"));
        assert!(text.ends_with("[q] quit"));
    }

    #[test]
    fn recent_window_keeps_insertion_order() {
        let recent: Vec<String> = ["one", "two", "three"].map(String::from).to_vec();
        assert_eq!(recent_window(&recent, 2), ["two", "three"]);
        assert_eq!(recent_window(&recent, 8), ["one", "two", "three"]);
        assert!(recent_window(&recent, 0).is_empty());
    }

    #[test]
    fn cursor_column_follows_text_and_stays_in_the_box() {
        let area = Rect::new(10, 0, 40, 3);
        assert_eq!(cursor_column(area, ""), 11);
        assert_eq!(cursor_column(area, "héllo"), 16);
        assert_eq!(cursor_column(area, &"x".repeat(100)), 48);
        assert_eq!(cursor_column(area, &"x".repeat(70_000)), 48);

        let edge = Rect::new(u16::MAX - 5, 0, 5, 3);
        assert_eq!(cursor_column(edge, &"x".repeat(70_000)), u16::MAX - 2);
    }

    #[test]
    fn every_view_has_an_empty_message() {
        for view in View::ALL {
            assert!(!empty_text(view).is_empty());
        }
    }
}
