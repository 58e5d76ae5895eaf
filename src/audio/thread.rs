use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, info, warn};

use crate::config::AudioSettings;

use super::source::{DecodedSource, open};
use super::types::{AudioCmd, MediaError, MediaEvent, MediaSource, SourceToken};

/// How often a pending load is checked for while the thread would otherwise
/// wait a full tick.
const LOAD_POLL: Duration = Duration::from_millis(20);

/// The currently loaded source and its sink.
struct Loaded {
    source: MediaSource,
    sink: Sink,
    duration: Option<Duration>,
    ended_reported: bool,
}

/// A source fetched and decoded by a loader thread.
struct Opened {
    token: SourceToken,
    source: MediaSource,
    result: Result<(DecodedSource, Option<Duration>), MediaError>,
}

/// State owned by the audio thread. Fetching and decoding happen on short
/// lived loader threads so commands are never stuck behind a download.
pub(super) struct AudioThread {
    stream: Option<OutputStream>,
    http: ureq::Agent,
    events: Sender<MediaEvent>,
    opened_tx: Sender<Opened>,
    opened_rx: Receiver<Opened>,
    settings: AudioSettings,
    token: Option<SourceToken>,
    loaded: Option<Loaded>,
    load_error: Option<String>,
    loading: bool,
    play_requested: bool,
    volume: f32,
}

impl AudioThread {
    pub(super) fn new(
        stream: Option<OutputStream>,
        events: Sender<MediaEvent>,
        settings: AudioSettings,
    ) -> Self {
        let mut agent = ureq::AgentBuilder::new();
        if settings.stream_timeout_secs > 0 {
            agent = agent.timeout(Duration::from_secs(settings.stream_timeout_secs));
        }
        let (opened_tx, opened_rx) = mpsc::channel();
        Self {
            stream,
            http: agent.build(),
            events,
            opened_tx,
            opened_rx,
            volume: settings.initial_volume,
            settings,
            token: None,
            loaded: None,
            load_error: None,
            loading: false,
            play_requested: false,
        }
    }

    pub(super) fn is_loading(&self) -> bool {
        self.loading
    }

    /// Apply one command. Returns false once the thread should stop.
    pub(super) fn handle(&mut self, cmd: AudioCmd) -> bool {
        match cmd {
            AudioCmd::Load { token, source } => self.load(token, source),
            AudioCmd::Play => self.play(),
            AudioCmd::Pause => self.pause(),
            AudioCmd::Seek(position) => self.seek(position),
            AudioCmd::SetVolume(volume) => self.set_volume(volume),
            AudioCmd::Quit { fade_out_ms } => {
                self.fade_out(fade_out_ms);
                info!("audio thread stopped");
                return false;
            }
        }
        true
    }

    fn emit(&self, event: MediaEvent) {
        // The receiver only goes away during shutdown.
        let _ = self.events.send(event);
    }

    fn reject(&self, token: SourceToken, reason: String) {
        warn!(token = token.0, %reason, "play rejected");
        self.emit(MediaEvent::PlayRejected { token, reason });
    }

    fn time_update(&self) {
        let (Some(token), Some(loaded)) = (self.token, self.loaded.as_ref()) else {
            return;
        };
        self.emit(MediaEvent::TimeUpdate {
            token,
            current_time: loaded.sink.get_pos().as_secs_f64(),
            duration: loaded.duration.map(|d| d.as_secs_f64()),
        });
    }

    fn load(&mut self, token: SourceToken, source: MediaSource) {
        if let Some(old) = self.loaded.take() {
            old.sink.stop();
        }
        self.token = Some(token);
        self.load_error = None;
        self.play_requested = false;

        let http = self.http.clone();
        let max_bytes = self.settings.max_stream_bytes;
        let opened = self.opened_tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("encore-load-{}", token.0))
            .spawn(move || {
                let result = open(&source, &http, max_bytes);
                // Nobody is listening once the audio thread has quit.
                let _ = opened.send(Opened {
                    token,
                    source,
                    result,
                });
            });
        match spawned {
            Ok(_) => self.loading = true,
            Err(e) => {
                error!(token = token.0, error = %e, "failed to spawn loader thread");
                self.loading = false;
                self.load_error = Some(e.to_string());
            }
        }
    }

    /// Install finished loads. Results for a superseded token are dropped.
    pub(super) fn finish_loads(&mut self) {
        while let Ok(opened) = self.opened_rx.try_recv() {
            self.finish_load(opened);
        }
    }

    fn finish_load(&mut self, opened: Opened) {
        let Opened {
            token,
            source,
            result,
        } = opened;
        if Some(token) != self.token {
            debug!(token = token.0, ?source, "dropping superseded load");
            return;
        }
        self.loading = false;

        let installed = result.and_then(|(decoded, duration)| {
            let stream = self.stream.as_ref().ok_or(MediaError::NoOutputDevice)?;
            let sink = Sink::connect_new(stream.mixer());
            sink.pause();
            sink.set_volume(self.volume);
            sink.append(decoded);
            debug!(token = token.0, ?source, ?duration, "source loaded");
            Ok(Loaded {
                source,
                sink,
                duration,
                ended_reported: false,
            })
        });
        match installed {
            Ok(loaded) => self.loaded = Some(loaded),
            Err(e) => {
                error!(token = token.0, error = %e, "failed to open source");
                self.load_error = Some(e.to_string());
            }
        }

        if std::mem::take(&mut self.play_requested) {
            self.play();
        }
    }

    fn play(&mut self) {
        let Some(token) = self.token else {
            debug!("play requested before any load");
            return;
        };
        if self.loading {
            self.play_requested = true;
            return;
        }
        let Some(loaded) = self.loaded.as_mut() else {
            let reason = self
                .load_error
                .clone()
                .unwrap_or_else(|| MediaError::NothingLoaded.to_string());
            self.reject(token, reason);
            return;
        };
        // Playing a finished source starts it over, like a media element does.
        if loaded.sink.empty() {
            let source = loaded.source.clone();
            self.load(token, source);
            self.play();
            return;
        }
        loaded.sink.play();
        loaded.ended_reported = false;
        self.time_update();
    }

    fn pause(&mut self) {
        self.play_requested = false;
        if let Some(loaded) = self.loaded.as_ref() {
            loaded.sink.pause();
        }
    }

    fn seek(&mut self, position: f64) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        let target = Duration::from_secs_f64(position.max(0.0));
        if let Err(e) = loaded.sink.try_seek(target) {
            warn!(?target, error = %e, "seek failed");
            return;
        }
        loaded.ended_reported = false;
        self.time_update();
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(loaded) = self.loaded.as_ref() {
            loaded.sink.set_volume(volume);
        }
    }

    /// Periodic clock: report progress and detect the natural end of a source.
    pub(super) fn tick(&mut self) {
        let Some(token) = self.token else {
            return;
        };
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        if loaded.sink.is_paused() {
            return;
        }
        if loaded.sink.empty() {
            if !loaded.ended_reported {
                loaded.ended_reported = true;
                self.emit(MediaEvent::Ended { token });
            }
            return;
        }
        self.time_update();
    }

    #[cfg(test)]
    pub(super) fn adopt(&mut self, token: SourceToken, source: MediaSource, sink: Sink) {
        self.token = Some(token);
        self.loaded = Some(Loaded {
            source,
            sink,
            duration: None,
            ended_reported: false,
        });
    }

    fn fade_out(&self, fade_out_ms: u64) {
        let Some(loaded) = self.loaded.as_ref() else {
            return;
        };
        let sink = &loaded.sink;
        if fade_out_ms == 0 || sink.is_paused() {
            sink.stop();
            return;
        }
        let steps: u64 = 20;
        let step_ms = (fade_out_ms / steps).max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            sink.set_volume(self.volume * (1.0 - t));
            thread::sleep(Duration::from_millis(step_ms));
        }
        sink.stop();
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<MediaEvent>,
    settings: AudioSettings,
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
                error!(error = %e, "no audio output device, every play will be rejected");
                None
            }
        };

        let tick = Duration::from_millis(settings.tick_ms.max(10));
        let mut audio = AudioThread::new(stream, events, settings);

        loop {
            let wait = if audio.is_loading() {
                tick.min(LOAD_POLL)
            } else {
                tick
            };
            match rx.recv_timeout(wait) {
                Ok(cmd) => {
                    if !audio.handle(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => audio.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
            audio.finish_loads();
        }
    })
}
