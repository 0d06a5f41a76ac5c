//! Floating transport control: what is playing, progress, volume.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::app::App;
use crate::config::{TimeField, UiSettings};
use crate::playback::{PlaybackSnapshot, Status};

use super::format_mmss;

const SLIDER_CELLS: usize = 20;

/// Rows the transport needs for the current flags.
pub(super) fn height(app: &App) -> u16 {
    if app.transport_minimized {
        3
    } else if app.volume_open {
        6
    } else {
        5
    }
}

/// Build the time text (elapsed/total/remaining) per `UiSettings`.
pub(super) fn time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    if ui.time_fields.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for f in &ui.time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.time_separator))
    }
}

/// Progress in `[0, 1]`; zero until the duration is known.
pub(super) fn progress_ratio(position: Duration, duration: Option<Duration>) -> f64 {
    match duration {
        Some(d) if !d.is_zero() => (position.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

pub(super) fn volume_slider(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * SLIDER_CELLS / 100;
    format!(
        "[{}{}] {:>3}%",
        "█".repeat(filled),
        "░".repeat(SLIDER_CELLS - filled),
        percent
    )
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Idle => "Stopped",
        Status::Playing => "Playing",
        Status::Paused => "Paused",
    }
}

/// Single line used both for the minimized view and as the headline.
pub(super) fn headline(snapshot: &PlaybackSnapshot, ui: &UiSettings) -> String {
    let Some(track) = &snapshot.current else {
        return "Nothing playing".to_string();
    };
    let state = &snapshot.state;
    let mut line = format!("{} • {}", status_label(state.status), track.title);
    if !track.language.trim().is_empty() {
        line.push_str(&format!(" ({})", track.language.trim()));
    }
    if let Some(time) = time_text(state.position, state.duration, ui) {
        line.push_str(&format!(" [{}]", time));
    }
    line
}

pub(super) fn render(frame: &mut Frame, area: Rect, app: &App, ui: &UiSettings) {
    let snapshot = &app.snapshot;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" player ")
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let idle = snapshot.current.is_none();
    if app.transport_minimized || idle {
        let mut line = headline(snapshot, ui);
        if app.transport_minimized && !idle {
            line.push_str(&format!(" • vol {}%", snapshot.state.volume_percent));
        }
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }

    let mut constraints = vec![Constraint::Length(1), Constraint::Length(1)];
    if app.volume_open {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    frame.render_widget(
        Paragraph::new(headline(snapshot, ui))
            .style(Style::default().add_modifier(Modifier::BOLD)),
        rows[0],
    );

    let state = &snapshot.state;
    let ratio = progress_ratio(state.position, state.duration);
    let label = match state.duration {
        Some(d) => format!("{} / {}", format_mmss(state.position), format_mmss(d)),
        None => format_mmss(state.position),
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, rows[1]);

    if app.volume_open {
        frame.render_widget(
            Paragraph::new(format!("Volume {}", volume_slider(state.volume_percent))),
            rows[2],
        );
    }
}
