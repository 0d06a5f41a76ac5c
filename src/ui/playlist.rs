//! Playlist browser overlay.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

/// Rough running time shown in the footer, assuming 3.5 minutes per track.
pub(super) fn estimated_minutes(count: usize) -> u64 {
    count as u64 * 7 / 2
}

pub(super) fn footer_text(count: usize) -> String {
    let noun = if count == 1 { "track" } else { "tracks" };
    format!("{} {} • ~{} min", count, noun, estimated_minutes(count))
}

pub(super) fn render(frame: &mut Frame, area: Rect, app: &App) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" playlist (enter play, d remove, C clear, esc close) ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let playlist = &app.snapshot.playlist;
    if playlist.is_empty() {
        frame.render_widget(
            Paragraph::new("Playlist is empty. Press enter on an audio publication to add it."),
            rows[0],
        );
    } else {
        let items: Vec<ListItem> = playlist
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let marker = if app.is_current(track.id) { "♪" } else { " " };
                let mut line = format!("{} {:>2}. {}", marker, i + 1, track.title);
                if !track.language.trim().is_empty() {
                    line.push_str(&format!(" ({})", track.language.trim()));
                }
                let item = ListItem::new(line);
                if app.is_current(track.id) {
                    item.style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    item
                }
            })
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(app.playlist_selected.min(playlist.len() - 1)));
        frame.render_stateful_widget(list, rows[0], &mut state);
    }

    frame.render_widget(Paragraph::new(footer_text(playlist.len())), rows[1]);
}
