use std::env;
use std::path::PathBuf;

use crate::app::App;
use crate::catalog::{Catalog, CatalogError, DirectoryCatalog, FileCatalog};
use crate::config;
use crate::stats::StatsStore;

/// Where the catalog comes from: first CLI argument, then `catalog.path`,
/// then the working directory.
pub fn catalog_path(arg: Option<String>, settings: &config::Settings) -> PathBuf {
    arg.map(PathBuf::from)
        .or_else(|| settings.catalog.path.clone())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Directories are scanned for audio files; anything else is read as a
/// catalog document.
pub fn open_catalog(path: PathBuf, settings: &config::Settings) -> Result<Catalog, CatalogError> {
    if path.is_dir() {
        DirectoryCatalog::new(path, settings.library.clone()).scan()
    } else {
        Catalog::load_from(&FileCatalog::new(path))
    }
}

pub fn apply_ui_defaults(app: &mut App, settings: &config::Settings) {
    app.transport_minimized = settings.ui.start_minimized;
}

/// Counter store at `stats.file`, else the XDG state dir. Without a home
/// directory the counts live only for this session.
pub fn open_stats(settings: &config::Settings) -> StatsStore {
    settings
        .stats
        .file
        .clone()
        .or_else(config::default_stats_path)
        .map(StatsStore::open)
        .unwrap_or_else(StatsStore::in_memory)
}
