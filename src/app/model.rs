//! Application model: `App`.
//!
//! The `App` struct holds the catalog being browsed, search and category
//! filters, and the flags of the transient surfaces. Playback state is never
//! owned here; it arrives as a `PlaybackSnapshot`.

use std::sync::Arc;

use crate::catalog::{Catalog, CatalogFilter, Category, Publication, Track, TrackId};
use crate::classify::{Classification, ClassifyError};
use crate::playback::PlaybackSnapshot;
use crate::stats::{PublicationStats, Stat, StatsStore};

/// The main application model.
pub struct App {
    pub publications: Vec<Publication>,
    pub categories: Vec<Category>,
    // One shared `Track` per playable publication, built once.
    tracks: Vec<Option<Arc<Track>>>,

    pub selected: usize,
    pub filter_mode: bool,
    pub filter_query: String,
    pub category_id: Option<String>,
    /// Question being typed for the classification assistant.
    pub ask_query: Option<String>,
    pub notice: Option<String>,

    pub playlist_open: bool,
    pub playlist_selected: usize,
    pub transport_minimized: bool,
    pub volume_open: bool,
    pub detail_open: bool,

    pub snapshot: PlaybackSnapshot,
    pub source_label: Option<String>,

    stats: StatsStore,
}

impl App {
    /// Create a new `App` over `catalog`, starting from an idle snapshot.
    pub fn new(catalog: Catalog, volume_percent: u8) -> Self {
        let tracks = catalog
            .publications
            .iter()
            .map(|p| Track::from_publication(p).map(Arc::new))
            .collect();

        Self {
            publications: catalog.publications,
            categories: catalog.categories,
            tracks,

            selected: 0,
            filter_mode: false,
            filter_query: String::new(),
            category_id: None,
            ask_query: None,
            notice: None,

            playlist_open: false,
            playlist_selected: 0,
            transport_minimized: false,
            volume_open: false,
            detail_open: false,

            snapshot: PlaybackSnapshot::empty(volume_percent),
            source_label: None,

            stats: StatsStore::in_memory(),
        }
    }

    pub fn set_stats(&mut self, stats: StatsStore) {
        self.stats = stats;
    }

    pub fn record(&mut self, id: TrackId, stat: Stat) -> PublicationStats {
        self.stats.increment(id, stat)
    }

    /// Counters of the highlighted publication.
    pub fn selected_stats(&self) -> PublicationStats {
        self.selected_publication()
            .map(|p| self.stats.get(p.id))
            .unwrap_or_default()
    }

    /// Put a link to the highlighted publication in the notice line and
    /// count the share.
    pub fn share_selected(&mut self) {
        let Some(p) = self.selected_publication() else {
            return;
        };
        let id = p.id;
        let Some(link) = p.browse_url.clone().or_else(|| p.download_url.clone()) else {
            self.set_notice("Nothing to share for this publication");
            return;
        };
        self.record(id, Stat::Share);
        self.set_notice(format!("Share link: {link}"));
    }

    pub fn set_source_label(&mut self, label: String) {
        self.source_label = Some(label);
    }

    pub fn filter(&self) -> CatalogFilter {
        CatalogFilter {
            query: self.filter_query.clone(),
            category_id: self.category_id.clone(),
        }
    }

    /// Indices of the publications currently visible, in catalog order.
    pub fn display_indices(&self) -> Vec<usize> {
        self.filter().visible_indices(&self.publications)
    }

    pub fn has_publications(&self) -> bool {
        !self.publications.is_empty()
    }

    pub fn selected_publication(&self) -> Option<&Publication> {
        self.display_indices()
            .contains(&self.selected)
            .then(|| &self.publications[self.selected])
    }

    /// Playable track behind the selected publication, if any.
    pub fn selected_track(&self) -> Option<Arc<Track>> {
        if !self.display_indices().contains(&self.selected) {
            return None;
        }
        self.track_at(self.selected)
    }

    pub fn track_at(&self, index: usize) -> Option<Arc<Track>> {
        self.tracks.get(index).cloned().flatten()
    }

    pub fn is_playable(&self, index: usize) -> bool {
        matches!(self.tracks.get(index), Some(Some(_)))
    }

    /// Display name of the active category filter.
    pub fn category_name(&self) -> Option<&str> {
        let id = self.category_id.as_deref()?;
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    /// Cycle the category filter: all -> first -> ... -> last -> all.
    pub fn cycle_category(&mut self) {
        let usable: Vec<&Category> = self.categories.iter().filter(|c| c.id != "all").collect();
        let pos = self
            .category_id
            .as_deref()
            .and_then(|id| usable.iter().position(|c| c.id == id));
        self.category_id = match pos {
            None => usable.first().map(|c| c.id.clone()),
            Some(p) => usable.get(p + 1).map(|c| c.id.clone()),
        };
        self.ensure_selected_visible();
    }

    /// Apply an assistant answer. Anything but a known category clears the
    /// category filter.
    pub fn apply_classification(&mut self, result: Result<Classification, ClassifyError>) {
        match result {
            Ok(c) => {
                let known = c
                    .category_id
                    .filter(|id| self.categories.iter().any(|cat| &cat.id == id));
                self.category_id = known;
                self.notice = Some(c.explanation);
            }
            Err(e) => {
                self.category_id = None;
                self.notice = Some(format!("Assistant unavailable ({e}); showing all results"));
            }
        }
        self.ensure_selected_visible();
    }

    pub fn start_ask(&mut self) {
        self.ask_query = Some(String::new());
    }

    pub fn cancel_ask(&mut self) {
        self.ask_query = None;
    }

    pub fn push_ask_char(&mut self, c: char) {
        if let Some(q) = self.ask_query.as_mut() {
            q.push(c);
        }
    }

    pub fn pop_ask_char(&mut self) {
        if let Some(q) = self.ask_query.as_mut() {
            q.pop();
        }
    }

    /// Finish the question, leaving ask mode.
    pub fn take_ask(&mut self) -> Option<String> {
        self.ask_query.take()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Enter filter mode (start editing the search query).
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.ensure_selected_visible();
    }
    /// Exit filter mode, keeping the query.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }
    /// Clear the query and the category filter.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.category_id = None;
        self.ensure_selected_visible();
    }
    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }
    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Keep `selected` inside the current view, else move it to the first
    /// visible publication.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }

        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }

    /// Move selection to the next visible publication, wrapping around.
    pub fn next(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        self.selected = match display.iter().position(|&i| i == self.selected) {
            Some(p) => display[(p + 1) % display.len()],
            None => display[0],
        };
    }

    /// Move selection to the previous visible publication, wrapping around.
    pub fn prev(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        self.selected = match display.iter().position(|&i| i == self.selected) {
            Some(0) | None => display[display.len() - 1],
            Some(p) => display[p - 1],
        };
    }

    /// Opening the detail popup counts as a view.
    pub fn toggle_detail(&mut self) {
        self.detail_open = !self.detail_open;
        if self.detail_open {
            if let Some(id) = self.selected_publication().map(|p| p.id) {
                self.record(id, Stat::View);
            }
        }
    }

    pub fn toggle_transport_minimized(&mut self) {
        self.transport_minimized = !self.transport_minimized;
    }

    pub fn toggle_volume_slider(&mut self) {
        self.volume_open = !self.volume_open;
    }

    /// Open the playlist with the cursor on the current track.
    pub fn open_playlist(&mut self) {
        self.playlist_open = true;
        self.playlist_selected = self
            .snapshot
            .state
            .current
            .and_then(|id| self.snapshot.playlist.iter().position(|t| t.id == id))
            .unwrap_or(0);
    }

    pub fn close_playlist(&mut self) {
        self.playlist_open = false;
    }

    pub fn playlist_next(&mut self) {
        let len = self.snapshot.playlist.len();
        if len > 0 {
            self.playlist_selected = (self.playlist_selected + 1) % len;
        }
    }

    pub fn playlist_prev(&mut self) {
        let len = self.snapshot.playlist.len();
        if len > 0 {
            self.playlist_selected = (self.playlist_selected + len - 1) % len;
        }
    }

    pub fn playlist_selection(&self) -> Option<&Arc<Track>> {
        self.snapshot.playlist.get(self.playlist_selected)
    }

    pub fn is_current(&self, id: TrackId) -> bool {
        self.snapshot.is_current(id)
    }

    /// Replace the displayed playback state with the latest push.
    pub fn apply_snapshot(&mut self, snapshot: PlaybackSnapshot) {
        self.snapshot = snapshot;
        let len = self.snapshot.playlist.len();
        if self.playlist_selected >= len {
            self.playlist_selected = len.saturating_sub(1);
        }
    }
}
