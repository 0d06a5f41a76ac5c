use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::App;
use crate::catalog::Track;
use crate::classify::CategoryClassifier;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::playback::{
    MediaEvent, MediaHandle, PlaybackCoordinator, PlaybackError, PlaybackSnapshot, Status,
};
use crate::runtime::mpris_sync::drain_snapshots;
use crate::stats::Stat;
use crate::ui;

/// Channels the event loop drains every iteration.
pub struct Inbox {
    pub media_events: Receiver<MediaEvent>,
    pub snapshots: Receiver<PlaybackSnapshot>,
    pub control_tx: mpsc::Sender<ControlCmd>,
    pub control_rx: Receiver<ControlCmd>,
}

/// Main terminal event loop: handles input, UI drawing, media signals and
/// MPRIS commands. Returns `Ok(())` when shutdown is requested.
pub fn run<M: MediaHandle>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    coordinator: &mut PlaybackCoordinator<M>,
    classifier: &dyn CategoryClassifier,
    mpris: &MprisHandle,
    inbox: &Inbox,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(ev) = inbox.media_events.try_recv() {
            coordinator.handle_media_event(ev);
        }

        drain_snapshots(&inbox.snapshots, app, Some(mpris));

        let display = app.display_indices();
        terminal.draw(|f| ui::draw(f, app, &display, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = inbox.control_rx.try_recv() {
            if handle_control_cmd(cmd, app, coordinator) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, coordinator, classifier, &inbox.control_tx)
                {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn report(app: &mut App, result: Result<(), PlaybackError>) {
    if let Err(e) = result {
        warn!(error = %e, "playback command failed");
        app.set_notice(e.to_string());
    }
}

/// Start `track` and count the download once the source opened.
fn play_track<M: MediaHandle>(
    app: &mut App,
    coordinator: &mut PlaybackCoordinator<M>,
    track: Arc<Track>,
) {
    let id = track.id;
    let result = coordinator.play(track);
    if result.is_ok() {
        app.record(id, Stat::Download);
    }
    report(app, result);
}

/// Play the highlighted publication. Already playing it is a no-op.
fn play_selected<M: MediaHandle>(app: &mut App, coordinator: &mut PlaybackCoordinator<M>) {
    let Some(track) = app.selected_track() else {
        if app.selected_publication().is_some() {
            app.set_notice("Not an audio publication");
        }
        return;
    };
    let state = coordinator.state();
    if state.status == Status::Playing && state.current == Some(track.id) {
        return;
    }
    play_track(app, coordinator, track);
}

/// Returns `true` when the app should quit.
pub(super) fn handle_control_cmd<M: MediaHandle>(
    cmd: ControlCmd,
    app: &mut App,
    coordinator: &mut PlaybackCoordinator<M>,
) -> bool {
    debug!(?cmd, "control command");
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => match coordinator.state().status {
            Status::Paused => {
                let result = coordinator.resume();
                report(app, result);
            }
            Status::Idle => play_selected(app, coordinator),
            Status::Playing => {}
        },
        ControlCmd::Pause => coordinator.pause(),
        ControlCmd::PlayPause => {
            if coordinator.state().status == Status::Idle {
                play_selected(app, coordinator);
            } else {
                let result = coordinator.toggle();
                report(app, result);
            }
        }
        ControlCmd::Stop => coordinator.stop(),
        ControlCmd::Next => {
            let result = coordinator.next();
            report(app, result);
        }
        ControlCmd::Prev => {
            let result = coordinator.previous();
            report(app, result);
        }
        ControlCmd::Volume(v) => coordinator.set_volume((v * 100.0).round() as i32),
    }
    false
}

/// Keys while the playlist overlay is open. Returns `true` when consumed.
fn handle_playlist_key<M: MediaHandle>(
    key: KeyEvent,
    app: &mut App,
    coordinator: &mut PlaybackCoordinator<M>,
) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('P') => app.close_playlist(),
        KeyCode::Char('j') | KeyCode::Down => app.playlist_next(),
        KeyCode::Char('k') | KeyCode::Up => app.playlist_prev(),
        KeyCode::Enter => {
            if let Some(track) = app.playlist_selection().cloned() {
                play_track(app, coordinator, track);
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = app.playlist_selection().map(|t| t.id) {
                coordinator.remove(id);
            }
        }
        KeyCode::Char('C') => coordinator.clear(),
        _ => return false,
    }
    true
}

/// Returns `true` when the app should quit.
pub(super) fn handle_key_event<M: MediaHandle>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    coordinator: &mut PlaybackCoordinator<M>,
    classifier: &dyn CategoryClassifier,
    control_tx: &mpsc::Sender<ControlCmd>,
) -> bool {
    if app.ask_query.is_some() {
        match key.code {
            KeyCode::Esc => app.cancel_ask(),
            KeyCode::Backspace => app.pop_ask_char(),
            KeyCode::Enter => {
                if let Some(question) = app.take_ask() {
                    let result = classifier.classify(&question, &app.categories);
                    debug!(?result, "classified query");
                    app.apply_classification(result);
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.push_ask_char(c),
            _ => {}
        }
        return false;
    }

    if app.filter_mode {
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Enter => app.exit_filter_mode(),
            KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => app.next(),
            KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => app.prev(),
            KeyCode::Down => app.next(),
            KeyCode::Up => app.prev(),
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_filter_char(c);
                }
            }
            _ => {}
        }
        return false;
    }

    if app.playlist_open && handle_playlist_key(key, app, coordinator) {
        return false;
    }

    let step = i32::from(settings.playback.volume_step);
    let seek = settings.controls.seek_seconds.min(i64::MAX as u64) as i64;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Char('?') => app.start_ask(),
        KeyCode::Tab => app.cycle_category(),
        KeyCode::Esc => {
            app.detail_open = false;
            app.volume_open = false;
            app.clear_notice();
        }
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => play_selected(app, coordinator),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('x') => {
            let _ = control_tx.send(ControlCmd::Stop);
        }
        KeyCode::Char('L') => coordinator.seek_by(seek),
        KeyCode::Char('H') => coordinator.seek_by(-seek),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let volume = i32::from(coordinator.state().volume_percent);
            coordinator.set_volume(volume + step);
        }
        KeyCode::Char('-') => {
            let volume = i32::from(coordinator.state().volume_percent);
            coordinator.set_volume(volume - step);
        }
        KeyCode::Char('v') => app.toggle_volume_slider(),
        KeyCode::Char('m') => app.toggle_transport_minimized(),
        KeyCode::Char('P') => app.open_playlist(),
        KeyCode::Char('K') => app.toggle_detail(),
        KeyCode::Char('s') => app.share_selected(),
        _ => {}
    }

    false
}
