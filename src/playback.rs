//! Playback coordination: one media handle, one playlist, one transport state.
//!
//! Display surfaces issue commands on [`PlaybackCoordinator`] and receive
//! [`PlaybackSnapshot`]s through [`PlaybackCoordinator::subscribe`]; they never
//! hold playback state of their own.

mod coordinator;
mod media;
mod playlist;
mod state;

pub use coordinator::{PlaybackCoordinator, PlaybackError};
pub use media::{MediaError, MediaEvent, MediaHandle, SourceId};
pub use state::{PlaybackSnapshot, Status};
