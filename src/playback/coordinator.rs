use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::catalog::{Track, TrackId};

use super::media::{MediaError, MediaEvent, MediaHandle, SourceId};
use super::playlist::Playlist;
use super::state::{PlaybackSnapshot, PlaybackState, Status};

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("track {track} could not be played: {source}")]
    Unavailable {
        track: TrackId,
        #[source]
        source: MediaError,
    },
}

/// Single source of truth for what is playing.
///
/// Owns the playlist, the transport state and the one media handle. Every
/// command leaves [`PlaybackState`] consistent and pushes a snapshot to all
/// subscribers when something changed.
pub struct PlaybackCoordinator<M: MediaHandle> {
    media: M,
    playlist: Playlist,
    state: PlaybackState,
    current_track: Option<Arc<Track>>,
    /// Tag of the source the media handle is currently playing.
    active_source: Option<SourceId>,
    next_source: SourceId,
    subscribers: Vec<Sender<PlaybackSnapshot>>,
}

impl<M: MediaHandle> PlaybackCoordinator<M> {
    pub fn new(mut media: M, volume_percent: u8) -> Self {
        let state = PlaybackState::new(volume_percent);
        media.set_volume(f32::from(state.volume_percent) / 100.0);
        Self {
            media,
            playlist: Playlist::new(),
            state,
            current_track: None,
            active_source: None,
            next_source: SourceId::first(),
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[cfg(test)]
    pub(super) fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state.clone(),
            current: self.current_track.clone(),
            playlist: self.playlist.tracks().to_vec(),
        }
    }

    /// Register a display surface. The current snapshot is delivered right away.
    pub fn subscribe(&mut self) -> Receiver<PlaybackSnapshot> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(self.snapshot());
        self.subscribers.push(tx);
        rx
    }

    /// Queue `track` (if new) and start it from the beginning.
    pub fn play(&mut self, track: Arc<Track>) -> Result<(), PlaybackError> {
        let id = track.id;
        if self.playlist.enqueue(track.clone()) {
            debug!(track = %id, "enqueued");
        }

        // Only one source may be live: drop the old one before assigning.
        self.release_source();
        let tag = self.next_source;
        self.next_source = tag.next();

        match self.start_source(tag, &track.source_uri) {
            Ok(()) => {
                debug!(track = %id, source = ?tag, "playing");
                self.active_source = Some(tag);
                self.current_track = Some(track);
                self.state.current = Some(id);
                self.state.status = Status::Playing;
                self.state.position = Duration::ZERO;
                self.state.duration = None;
                self.publish();
                Ok(())
            }
            Err(source) => {
                warn!(track = %id, error = %source, "failed to start playback");
                self.release_source();
                self.fall_back_to_idle();
                self.publish();
                Err(PlaybackError::Unavailable { track: id, source })
            }
        }
    }

    fn start_source(&mut self, source: SourceId, uri: &str) -> Result<(), MediaError> {
        self.media.set_source(source, uri)?;
        self.media.play()
    }

    pub fn pause(&mut self) {
        if self.state.status != Status::Playing {
            return;
        }
        self.media.pause();
        self.state.status = Status::Paused;
        self.publish();
    }

    pub fn resume(&mut self) -> Result<(), PlaybackError> {
        if self.state.status != Status::Paused {
            return Ok(());
        }
        let Some(track) = self.state.current else {
            return Ok(());
        };
        match self.media.play() {
            Ok(()) => {
                self.state.status = Status::Playing;
                self.publish();
                Ok(())
            }
            Err(source) => {
                warn!(%track, error = %source, "failed to resume playback");
                self.release_source();
                self.fall_back_to_idle();
                self.publish();
                Err(PlaybackError::Unavailable { track, source })
            }
        }
    }

    /// Pause when playing, resume when paused, nothing when idle.
    pub fn toggle(&mut self) -> Result<(), PlaybackError> {
        match self.state.status {
            Status::Playing => {
                self.pause();
                Ok(())
            }
            Status::Paused => self.resume(),
            Status::Idle => Ok(()),
        }
    }

    pub fn next(&mut self) -> Result<(), PlaybackError> {
        match self.neighbour(Direction::Next) {
            Some(track) => self.play(track),
            None => Ok(()),
        }
    }

    pub fn previous(&mut self) -> Result<(), PlaybackError> {
        match self.neighbour(Direction::Previous) {
            Some(track) => self.play(track),
            None => Ok(()),
        }
    }

    fn neighbour(&self, direction: Direction) -> Option<Arc<Track>> {
        let current = self.state.current?;
        if self.playlist.is_empty() {
            return None;
        }
        let track = match direction {
            Direction::Next => self.playlist.next_after(current),
            Direction::Previous => self.playlist.previous_before(current),
        };
        if track.is_none() {
            // Invariants say this cannot happen; stay put if it does.
            warn!(track = %current, "current track missing from playlist");
        }
        track.cloned()
    }

    /// Drop `id` from the playlist. Removing the current track stops playback
    /// without advancing.
    pub fn remove(&mut self, id: TrackId) {
        let removed = self.playlist.remove(id).is_some();
        let was_current = self.state.current == Some(id);
        if was_current {
            self.release_source();
            self.fall_back_to_idle();
        }
        if removed || was_current {
            debug!(track = %id, was_current, "removed from playlist");
            self.publish();
        }
    }

    pub fn clear(&mut self) {
        self.playlist.clear();
        self.release_source();
        self.fall_back_to_idle();
        debug!("playlist cleared");
        self.publish();
    }

    /// Close the transport: stop the current track, keep the playlist.
    pub fn stop(&mut self) {
        if self.state.status == Status::Idle {
            return;
        }
        self.release_source();
        self.fall_back_to_idle();
        self.publish();
    }

    pub fn set_volume(&mut self, percent: i32) {
        let percent = percent.clamp(0, 100) as u8;
        self.media.set_volume(f32::from(percent) / 100.0);
        if self.state.volume_percent != percent {
            self.state.volume_percent = percent;
            self.publish();
        }
    }

    /// Jump to `seconds`, clamped to the track. Ignored when nothing is loaded.
    pub fn seek(&mut self, seconds: f64) {
        if self.state.current.is_none() {
            return;
        }
        // NaN has no position; +inf clamps to the end like any huge value.
        let seconds = if seconds.is_nan() {
            0.0
        } else {
            seconds.clamp(0.0, f64::MAX)
        };
        let mut position = Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX);
        if let Some(duration) = self.state.duration {
            position = position.min(duration);
        }
        self.media.seek(position);
        self.state.position = position;
        self.publish();
    }

    pub fn seek_by(&mut self, delta_seconds: i64) {
        let target = self.state.position.as_secs_f64() + delta_seconds as f64;
        self.seek(target);
    }

    /// Apply a signal from the media handle. Signals for any source other than
    /// the active one are stale and ignored.
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        if self.active_source != Some(event.source()) {
            trace!(?event, "dropping event for inactive source");
            return;
        }

        match event {
            MediaEvent::MetadataLoaded { duration, .. } => {
                self.state.duration = Some(duration);
                self.state.position = self.state.position.min(duration);
                self.publish();
            }
            MediaEvent::TimeUpdate { position, .. } => {
                // Paused position stays where it was last reported.
                if self.state.status != Status::Playing {
                    return;
                }
                self.state.position = match self.state.duration {
                    Some(duration) => position.min(duration),
                    None => position,
                };
                self.publish();
            }
            MediaEvent::Ended { .. } => {
                if self.state.status != Status::Playing {
                    return;
                }
                self.advance_after_end();
            }
            MediaEvent::Error { message, .. } => {
                warn!(track = ?self.state.current, %message, "media error");
                self.release_source();
                self.fall_back_to_idle();
                self.publish();
            }
        }
    }

    fn advance_after_end(&mut self) {
        match self.neighbour(Direction::Next) {
            Some(track) => {
                if let Err(e) = self.play(track) {
                    warn!(error = %e, "auto-advance failed");
                }
            }
            None => {
                self.release_source();
                self.fall_back_to_idle();
                self.publish();
            }
        }
    }

    fn release_source(&mut self) {
        self.media.release();
        self.active_source = None;
    }

    fn fall_back_to_idle(&mut self) {
        self.current_track = None;
        self.state.current = None;
        self.state.status = Status::Idle;
        self.state.position = Duration::ZERO;
        self.state.duration = None;
    }

    fn publish(&mut self) {
        debug_assert!(self.state.is_consistent(), "inconsistent state: {:?}", self.state);
        let snapshot = self.snapshot();
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

#[derive(Copy, Clone)]
enum Direction {
    Next,
    Previous,
}
