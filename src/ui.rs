//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the catalog browser using `ratatui`. The transport and
//! playlist surfaces live in their own submodules and draw only from the last
//! pushed `PlaybackSnapshot`.

mod playlist;
mod transport;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::App;
use crate::catalog::{Publication, fuzzy_match_positions};
use crate::config::{ControlsSettings, UiSettings};
use crate::stats::PublicationStats;

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("enter".to_string(), "play selected".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next".to_string());
    // H/L is filled dynamically from config.
    map.insert("+/-".to_string(), "volume".to_string());
    map.insert("v".to_string(), "volume slider".to_string());
    map.insert("m".to_string(), "minimize player".to_string());
    map.insert("x".to_string(), "close player".to_string());
    map.insert("P".to_string(), "playlist".to_string());
    map.insert("/".to_string(), "search".to_string());
    map.insert("tab".to_string(), "category".to_string());
    map.insert("?".to_string(), "ask assistant".to_string());
    map.insert("K".to_string(), "details".to_string());
    map.insert("s".to_string(), "share".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating seek seconds.
fn controls_text(seek_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "enter", "space/p", "h/l", "H/L", "+/-", "v", "m", "x", "P", "/", "tab", "?",
        "K", "s", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{}s", seek_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `m:ss`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Upper-case the characters of `title` matched by `query`.
fn highlight_matches(title: &str, query: &str) -> String {
    let Some(positions) = fuzzy_match_positions(title, query) else {
        return title.to_string();
    };
    let mut rendered = String::with_capacity(title.len());
    let mut pos_iter = positions.into_iter();
    let mut next_pos = pos_iter.next();

    for (ci, ch) in title.chars().enumerate() {
        if next_pos == Some(ci) {
            rendered.extend(ch.to_uppercase());
            next_pos = pos_iter.next();
        } else {
            rendered.push(ch);
        }
    }
    rendered
}

/// One catalog row: title, kind and language, with a marker on the track
/// that is currently loaded.
fn catalog_row(app: &App, index: usize, query: &str) -> String {
    let p = &app.publications[index];
    let title = if query.is_empty() {
        p.title.clone()
    } else {
        highlight_matches(&p.title, query)
    };
    let marker = if app.is_current(p.id) {
        "♪ "
    } else if app.is_playable(index) {
        "  "
    } else {
        "· "
    };
    format!("{}{} [{}] {}", marker, title, p.kind.label(), p.language)
}

fn status_text(app: &App) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(
        " CATEGORY: {}",
        app.category_name().unwrap_or("All")
    ));

    let q = app.filter_query.trim();
    if app.filter_mode || !q.is_empty() {
        let mut filter_part = String::from("SEARCH:");
        if !q.is_empty() {
            filter_part.push(' ');
            filter_part.push_str(q);
        }
        parts.push(filter_part);
    }

    if let Some(ask) = &app.ask_query {
        parts.push(format!("ASK: {}", ask));
    }

    parts.push(format!(
        "{} of {} shown",
        app.display_indices().len(),
        app.publications.len()
    ));

    if let Some(source) = &app.source_label {
        parts.push(format!("Catalog: {}", source));
    }
    if let Some(notice) = &app.notice {
        parts.push(notice.clone());
    }

    parts.join(" • ")
}

fn detail_text(publication: Option<&Publication>, stats: PublicationStats) -> String {
    let Some(p) = publication else {
        return "Nothing selected".to_string();
    };
    let mut lines = vec![
        format!("Title: {}", p.title),
        format!("Kind: {}", p.kind.label()),
        format!("Language: {}", p.language),
        format!("Category: {}", p.category_id),
    ];
    if !p.description.trim().is_empty() {
        lines.push(format!("About: {}", p.description.trim()));
    }
    if !p.cover_url.is_empty() {
        lines.push(format!("Cover: {}", p.cover_url));
    }
    if let Some(url) = &p.browse_url {
        lines.push(format!("Browse: {}", url));
    }
    match &p.download_url {
        Some(url) if p.is_playable() => lines.push(format!("Audio: {}", url)),
        Some(url) => lines.push(format!("Download: {}", url)),
        None => {}
    }
    lines.push(format!(
        "Views: {} • Downloads: {} • Shares: {}",
        stats.views, stats.downloads, stats.shares
    ));
    lines.join("\n")
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    display: &[usize],
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(transport::height(app)),
            Constraint::Length(4),
        ])
        .split(frame.area());
    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tilawa ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status_par = Paragraph::new(status_text(app))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Main list
    {
        let q = app.filter_query.trim();

        // Center the selected item when possible by creating a visible window.
        // Only build ListItems for the visible window.
        let total = display.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = display[start..end]
            .iter()
            .map(|&i| ListItem::new(catalog_row(app, i, q)))
            .collect();

        let title = if total == 0 && app.has_publications() {
            " publications (no matches) "
        } else {
            " publications "
        };
        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 && !app.playlist_open {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Overlays stay inside the list area so header/status/footer stay visible.
    if app.detail_open {
        let popup_area = centered_rect_sized(72, 12, chunks[2]);
        frame.render_widget(Clear, popup_area);
        let detail = Paragraph::new(detail_text(app.selected_publication(), app.selected_stats()))
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(" details (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(detail, popup_area);
    }
    if app.playlist_open {
        playlist::render(frame, centered_rect_sized(64, 18, chunks[2]), app);
    }

    transport::render(frame, chunks[3], app, ui_settings);

    let footer = Paragraph::new(controls_text(controls_settings.seek_seconds))
        .italic()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[4]);
}

#[cfg(test)]
mod tests;
