use std::sync::Arc;

use crate::catalog::{Track, TrackId};

/// Ordered, duplicate-free queue of tracks.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Arc<Track>>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Arc<Track>] {
        &self.tracks
    }

    pub fn position(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.position(id).is_some()
    }

    /// Append `track` unless its id is already queued. Returns whether it was added.
    pub fn enqueue(&mut self, track: Arc<Track>) -> bool {
        if self.contains(track.id) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    pub fn remove(&mut self, id: TrackId) -> Option<Arc<Track>> {
        let pos = self.position(id)?;
        Some(self.tracks.remove(pos))
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// The track after `id`, wrapping to the first. `None` if `id` is not queued.
    pub fn next_after(&self, id: TrackId) -> Option<&Arc<Track>> {
        let pos = self.position(id)?;
        self.tracks.get((pos + 1) % self.tracks.len())
    }

    /// The track before `id`, wrapping to the last. `None` if `id` is not queued.
    pub fn previous_before(&self, id: TrackId) -> Option<&Arc<Track>> {
        let pos = self.position(id)?;
        let prev = if pos == 0 {
            self.tracks.len() - 1
        } else {
            pos - 1
        };
        self.tracks.get(prev)
    }
}
