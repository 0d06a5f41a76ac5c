//! Transport state owned by the coordinator and the snapshots it pushes.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{Track, TrackId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Playing,
    Paused,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    pub current: Option<TrackId>,
    pub status: Status,
    pub position: Duration,
    /// Unknown until the media source reports its metadata.
    pub duration: Option<Duration>,
    pub volume_percent: u8,
}

impl PlaybackState {
    pub fn new(volume_percent: u8) -> Self {
        Self {
            current: None,
            status: Status::Idle,
            position: Duration::ZERO,
            duration: None,
            volume_percent: volume_percent.min(100),
        }
    }

    /// `Idle` exactly when nothing is current, and the position never passes
    /// a known duration.
    pub fn is_consistent(&self) -> bool {
        let status_ok = (self.status == Status::Idle) == self.current.is_none();
        let position_ok = self.duration.is_none_or(|d| self.position <= d);
        status_ok && position_ok && self.volume_percent <= 100
    }
}

/// Everything a display surface needs to render, pushed on every change.
#[derive(Clone, Debug)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub current: Option<Arc<Track>>,
    pub playlist: Vec<Arc<Track>>,
}

impl PlaybackSnapshot {
    pub fn empty(volume_percent: u8) -> Self {
        Self {
            state: PlaybackState::new(volume_percent),
            current: None,
            playlist: Vec::new(),
        }
    }

    pub fn is_current(&self, id: TrackId) -> bool {
        self.state.current == Some(id)
    }
}
