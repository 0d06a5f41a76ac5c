use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::playback::{MediaError, MediaEvent, MediaHandle, SourceId};

use super::source::resolve_source_path;
use super::thread::spawn_audio_thread;
use super::types::AudioCmd;

/// `MediaHandle` backed by a dedicated `rodio` thread.
///
/// Commands travel over a channel; the thread reports back on the event
/// receiver returned by [`RodioMedia::spawn`].
pub struct RodioMedia {
    tx: Sender<AudioCmd>,
    join: Option<JoinHandle<()>>,
}

impl RodioMedia {
    pub fn spawn(audio_settings: AudioSettings) -> (Self, Receiver<MediaEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<MediaEvent>();

        let join = spawn_audio_thread(rx, event_tx, audio_settings);

        (
            Self {
                tx,
                join: Some(join),
            },
            event_rx,
        )
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), MediaError> {
        self.tx.send(cmd).map_err(|_| MediaError::Disconnected)
    }

    pub fn quit_softly(&mut self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl Drop for RodioMedia {
    fn drop(&mut self) {
        if self.join.is_some() {
            self.quit_softly(Duration::ZERO);
        }
    }
}

impl MediaHandle for RodioMedia {
    fn set_source(&mut self, source: SourceId, uri: &str) -> Result<(), MediaError> {
        let path = resolve_source_path(uri)?;
        if !path.is_file() {
            return Err(MediaError::Unavailable {
                uri: uri.to_string(),
                reason: "no such file".to_string(),
            });
        }
        self.send(AudioCmd::Load { source, path })
    }

    fn release(&mut self) {
        let _ = self.send(AudioCmd::Release);
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.send(AudioCmd::Play)
    }

    fn pause(&mut self) {
        let _ = self.send(AudioCmd::Pause);
    }

    fn seek(&mut self, position: Duration) {
        let _ = self.send(AudioCmd::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        let _ = self.send(AudioCmd::SetVolume(volume));
    }
}
