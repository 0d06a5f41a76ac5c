use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::config::AudioSettings;
use crate::playback::{MediaEvent, SourceId};

use super::sink::create_sink_at;
use super::types::{AudioCmd, SinkError};

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<MediaEvent>,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
                // but noisy for a TUI app.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                warn!(error = %e, "no audio output device; every source will fail");
                None
            }
        };

        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));
        let mut slot = Slot::new(events);

        loop {
            match rx.recv_timeout(tick) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    slot.fade_out(fade_out_ms);
                    slot.stop();
                    break;
                }
                Ok(cmd) => slot.apply(cmd, stream.as_ref()),
                Err(RecvTimeoutError::Timeout) => slot.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        info!("audio thread stopped");
    })
}

/// Wall-clock position of the current source: the running segment plus
/// whatever accumulated before the last pause or seek.
#[derive(Debug, Default)]
struct Clock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Clock {
    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    /// Restart counting from `position`.
    fn reset(&mut self, position: Duration, running: bool) {
        self.accumulated = position;
        self.started_at = running.then(Instant::now);
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }
}

/// The one output slot: at most a single sink exists at any time.
struct Slot {
    events: Sender<MediaEvent>,
    source: Option<SourceId>,
    path: Option<PathBuf>,
    sink: Option<Sink>,
    playing: bool,
    clock: Clock,
    volume: f32,
}

impl Slot {
    fn new(events: Sender<MediaEvent>) -> Self {
        Self {
            events,
            source: None,
            path: None,
            sink: None,
            playing: false,
            clock: Clock::default(),
            volume: 1.0,
        }
    }

    fn emit(&self, event: MediaEvent) {
        // The coordinator going away is how shutdown looks from here.
        let _ = self.events.send(event);
    }

    fn fail(&self, source: SourceId, error: SinkError) {
        warn!(?source, %error, "audio source failed");
        self.emit(MediaEvent::Error {
            source,
            message: error.to_string(),
        });
    }

    fn apply(&mut self, cmd: AudioCmd, stream: Option<&OutputStream>) {
        match cmd {
            AudioCmd::Load { source, path } => self.load(source, path, stream),
            AudioCmd::Release => self.stop(),
            AudioCmd::Play => self.play(),
            AudioCmd::Pause => self.pause(),
            AudioCmd::Seek(position) => self.seek(position, stream),
            AudioCmd::SetVolume(volume) => {
                self.volume = volume.clamp(0.0, 1.0);
                if let Some(sink) = &self.sink {
                    sink.set_volume(self.volume);
                }
            }
            // Handled by the thread loop.
            AudioCmd::Quit { .. } => {}
        }
    }

    fn load(&mut self, source: SourceId, path: PathBuf, stream: Option<&OutputStream>) {
        self.stop();
        self.source = Some(source);
        self.path = Some(path.clone());

        let Some(stream) = stream else {
            self.fail(source, SinkError::NoOutput);
            return;
        };

        match create_sink_at(stream, &path, Duration::ZERO) {
            Ok((sink, total)) => {
                sink.set_volume(self.volume);
                self.sink = Some(sink);
                debug!(?source, path = %path.display(), "source loaded");
                if let Some(duration) = total {
                    self.emit(MediaEvent::MetadataLoaded { source, duration });
                }
            }
            Err(e) => self.fail(source, e),
        }
    }

    fn play(&mut self) {
        let Some(sink) = &self.sink else {
            return;
        };
        if !self.playing {
            sink.play();
            self.playing = true;
            self.clock.start();
        }
    }

    fn pause(&mut self) {
        let Some(sink) = &self.sink else {
            return;
        };
        if self.playing {
            sink.pause();
            self.clock.pause();
            self.playing = false;
        }
    }

    /// Rebuild the current sink and skip into the file.
    /// This uses `Source::skip_duration` (works for common formats).
    fn seek(&mut self, position: Duration, stream: Option<&OutputStream>) {
        let (Some(source), Some(path), Some(stream)) = (self.source, self.path.clone(), stream)
        else {
            return;
        };
        if self.sink.is_none() {
            return;
        }

        if let Some(old) = self.sink.take() {
            old.stop();
        }

        match create_sink_at(stream, &path, position) {
            Ok((sink, _)) => {
                sink.set_volume(self.volume);
                if self.playing {
                    sink.play();
                }
                self.clock.reset(position, self.playing);
                self.sink = Some(sink);
            }
            Err(e) => {
                self.playing = false;
                self.clock.reset(Duration::ZERO, false);
                self.fail(source, e);
            }
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.source = None;
        self.path = None;
        self.playing = false;
        self.clock.reset(Duration::ZERO, false);
    }

    /// Periodic position report and end-of-track detection.
    fn tick(&mut self) {
        if !self.playing {
            return;
        }
        let Some(finished) = self.sink.as_ref().map(Sink::empty) else {
            return;
        };
        self.report(finished);
    }

    /// Emit `Ended` once when the source ran dry, otherwise the position.
    fn report(&mut self, finished: bool) {
        let Some(source) = self.source else {
            return;
        };
        if !self.playing {
            return;
        }
        if finished {
            self.playing = false;
            self.clock.pause();
            self.emit(MediaEvent::Ended { source });
        } else {
            self.emit(MediaEvent::TimeUpdate {
                source,
                position: self.clock.elapsed(),
            });
        }
    }

    fn fade_out(&self, fade_out_ms: u64) {
        let Some(sink) = &self.sink else {
            return;
        };
        if fade_out_ms == 0 || !self.playing {
            sink.set_volume(0.0);
            return;
        }
        let steps: u64 = 20;
        let step_ms = (fade_out_ms / steps).max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            sink.set_volume(self.volume * (1.0 - t));
            thread::sleep(Duration::from_millis(step_ms));
        }
        sink.set_volume(0.0);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    fn slot() -> (Slot, mpsc::Receiver<MediaEvent>) {
        let (tx, rx) = mpsc::channel();
        (Slot::new(tx), rx)
    }

    #[test]
    fn clock_accumulates_across_pauses() {
        let mut clock = Clock::default();
        assert_eq!(clock.elapsed(), Duration::ZERO);

        clock.start();
        thread::sleep(Duration::from_millis(20));
        clock.pause();
        let first = clock.elapsed();
        assert!(first >= Duration::from_millis(20));

        // Frozen while paused.
        thread::sleep(Duration::from_millis(10));
        assert_eq!(clock.elapsed(), first);

        clock.start();
        thread::sleep(Duration::from_millis(10));
        clock.pause();
        assert!(clock.elapsed() >= first + Duration::from_millis(10));
    }

    #[test]
    fn clock_reset_replaces_accumulated_time() {
        let mut clock = Clock::default();
        clock.start();
        thread::sleep(Duration::from_millis(5));
        clock.pause();

        clock.reset(Duration::from_secs(30), false);
        assert_eq!(clock.elapsed(), Duration::from_secs(30));

        clock.reset(Duration::from_secs(30), true);
        assert!(clock.elapsed() >= Duration::from_secs(30));
        clock.reset(Duration::ZERO, false);
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn end_of_source_is_reported_once() {
        let (mut slot, rx) = slot();
        let source = SourceId::first();
        slot.source = Some(source);
        slot.playing = true;
        slot.clock.reset(Duration::from_secs(4), false);

        slot.report(false);
        slot.report(true);
        slot.report(true);
        slot.tick();

        let events: Vec<MediaEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            MediaEvent::TimeUpdate { position, .. } if position == Duration::from_secs(4)
        ));
        assert!(matches!(events[1], MediaEvent::Ended { source: s } if s == source));
        assert!(!slot.playing);
    }

    #[test]
    fn nothing_is_reported_without_a_source_or_while_paused() {
        let (mut slot, rx) = slot();
        slot.playing = true;
        slot.report(false);

        slot.source = Some(SourceId::first());
        slot.playing = false;
        slot.report(true);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn stop_forgets_the_source_and_position() {
        let (mut slot, _rx) = slot();
        slot.source = Some(SourceId::first());
        slot.path = Some(PathBuf::from("/srv/audio/001.mp3"));
        slot.playing = true;
        slot.clock.reset(Duration::from_secs(12), true);

        slot.stop();
        assert_eq!(slot.source, None);
        assert_eq!(slot.path, None);
        assert!(!slot.playing);
        assert_eq!(slot.clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn play_and_pause_without_a_sink_are_ignored() {
        let (mut slot, _rx) = slot();
        slot.play();
        assert!(!slot.playing);
        slot.pause();
        assert_eq!(slot.clock.elapsed(), Duration::ZERO);
    }
}
