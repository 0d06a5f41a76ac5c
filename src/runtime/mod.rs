use std::env;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};

use crate::app::App;
use crate::audio::RodioMedia;
use crate::classify::KeywordClassifier;
use crate::logging;
use crate::mpris::ControlCmd;
use crate::playback::PlaybackCoordinator;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();
    logging::init(&settings.log)?;
    if let Some(msg) = settings_warning {
        warn!("{msg}");
    }

    let path = startup::catalog_path(env::args().nth(1), &settings);
    let catalog = startup::open_catalog(path.clone(), &settings).inspect_err(|e| {
        error!(error = %e, "failed to load catalog");
    })?;
    info!(
        path = %path.display(),
        publications = catalog.publications.len(),
        categories = catalog.categories.len(),
        "catalog loaded"
    );

    let (media, media_events) = RodioMedia::spawn(settings.audio.clone());
    let mut coordinator = PlaybackCoordinator::new(media, settings.playback.volume);
    let snapshots = coordinator.subscribe();

    let mut app = App::new(catalog, settings.playback.volume);
    app.set_source_label(path.display().to_string());
    app.set_stats(startup::open_stats(&settings));
    startup::apply_ui_defaults(&mut app, &settings);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    let inbox = event_loop::Inbox {
        media_events,
        snapshots,
        control_tx,
        control_rx,
    };

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut coordinator,
        &KeywordClassifier,
        &mpris,
        &inbox,
    );

    coordinator
        .media_mut()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("shutdown");
    run_result
}
