//! Commands understood by the audio thread and its local errors.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::playback::SourceId;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source with `path`, paused at the start.
    Load { source: SourceId, path: PathBuf },
    /// Stop and drop the current source.
    Release,
    Play,
    Pause,
    /// Jump to an absolute position in the current source.
    Seek(Duration),
    /// Linear gain in `0.0..=1.0`.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("no audio output device")]
    NoOutput,
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}
