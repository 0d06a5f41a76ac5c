//! The single playable-audio primitive the coordinator drives, and the
//! signals it reports back.

use std::time::Duration;

use thiserror::Error;

/// Tag handed to the media handle with every new source. Events carry it back
/// so the coordinator can drop anything reported for a source it has replaced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    pub fn first() -> Self {
        Self(1)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    MetadataLoaded { source: SourceId, duration: Duration },
    TimeUpdate { source: SourceId, position: Duration },
    Ended { source: SourceId },
    Error { source: SourceId, message: String },
}

impl MediaEvent {
    pub fn source(&self) -> SourceId {
        match self {
            Self::MetadataLoaded { source, .. }
            | Self::TimeUpdate { source, .. }
            | Self::Ended { source }
            | Self::Error { source, .. } => *source,
        }
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("unsupported source {0:?}")]
    UnsupportedSource(String),
    #[error("source {uri:?} is unavailable: {reason}")]
    Unavailable { uri: String, reason: String },
    #[error("media backend is not running")]
    Disconnected,
}

/// A single audio output slot.
///
/// Starting failures that can be detected right away are returned; anything
/// found later (decoding, device loss) arrives as [`MediaEvent::Error`].
pub trait MediaHandle {
    fn set_source(&mut self, source: SourceId, uri: &str) -> Result<(), MediaError>;
    /// Stop and forget the current source, if any.
    fn release(&mut self);
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    /// `volume` is linear gain in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);
}
