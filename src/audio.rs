//! Audio elements the playback controller drives.
//!
//! `SinkAudio` plays a file through `rodio`; `ClockAudio` is a silent
//! stand-in that advances with wall-clock time, useful without an output
//! device. Both report position the same way: a base offset set by the last
//! seek plus the time spent playing since then.

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// The media element contract: a seekable playhead that can be played and paused.
pub trait AudioElement {
    /// Current playhead position in seconds.
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
}

#[derive(Debug, Default)]
struct PlayClock {
    base: Duration,
    started_at: Option<Instant>,
    elapsed: Duration,
    total: Option<Duration>,
}

impl PlayClock {
    fn position(&self) -> Duration {
        let running = self
            .started_at
            .map(|started| Instant::now().saturating_duration_since(started))
            .unwrap_or_default();
        let pos = self.base + self.elapsed + running;
        match self.total {
            Some(total) => pos.min(total),
            None => pos,
        }
    }

    fn is_finished(&self) -> bool {
        self.total.is_some_and(|total| self.position() >= total)
    }

    fn reset_to(&mut self, position: Duration) {
        self.base = position;
        self.elapsed = Duration::ZERO;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        if let Some(started) = self.started_at.take() {
            self.elapsed += Instant::now().saturating_duration_since(started);
        }
    }
}

fn seconds_to_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or_default()
}

/// Audio file played through the default output device.
pub struct SinkAudio {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Sink,
    path: PathBuf,
    clock: PlayClock,
}

impl SinkAudio {
    /// Open `path` on the default output device, paused at position zero.
    pub fn open(path: &Path) -> Result<Self> {
        let total = open_decoder(path)?.total_duration();
        let (_stream, handle) = OutputStream::try_default().context("Opening audio output")?;
        let sink = load_sink(&handle, path, Duration::ZERO)?;
        info!(
            path = %path.display(),
            duration_secs = total.map(|d| d.as_secs_f64()),
            "Opened audio track"
        );
        Ok(Self {
            _stream,
            handle,
            sink,
            path: path.to_path_buf(),
            clock: PlayClock {
                total,
                ..PlayClock::default()
            },
        })
    }
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file =
        File::open(path).with_context(|| format!("Opening audio file {}", path.display()))?;
    Decoder::new(BufReader::new(file))
        .with_context(|| format!("Decoding audio file {}", path.display()))
}

fn load_sink(handle: &OutputStreamHandle, path: &Path, offset: Duration) -> Result<Sink> {
    let sink = Sink::try_new(handle).context("Creating sink")?;
    sink.pause();
    let source = open_decoder(path)?.skip_duration(offset);
    sink.append(source);
    Ok(sink)
}

impl AudioElement for SinkAudio {
    fn current_time(&self) -> f64 {
        self.clock.position().as_secs_f64()
    }

    fn set_current_time(&mut self, seconds: f64) {
        let offset = seconds_to_duration(seconds);
        let was_playing = !self.is_paused();
        match load_sink(&self.handle, &self.path, offset) {
            Ok(sink) => {
                self.sink.stop();
                if was_playing {
                    sink.play();
                }
                self.sink = sink;
                self.clock.reset_to(offset);
                debug!(position = seconds, "Moved audio playhead");
            }
            Err(err) => warn!(position = seconds, "Failed to seek audio: {err:#}"),
        }
    }

    fn play(&mut self) {
        debug!("Resuming playback");
        self.sink.play();
        self.clock.start();
    }

    fn pause(&mut self) {
        debug!("Pausing playback");
        self.sink.pause();
        self.clock.stop();
    }

    fn is_paused(&self) -> bool {
        self.sink.is_paused() || self.sink.empty() || self.clock.is_finished()
    }
}

/// Silent playhead that advances in real time, stopping at `total` if given.
#[derive(Debug, Default)]
pub struct ClockAudio {
    clock: PlayClock,
}

impl ClockAudio {
    pub fn new(total: Option<Duration>) -> Self {
        info!(
            duration_secs = total.map(|d| d.as_secs_f64()),
            "Using silent playback clock"
        );
        Self {
            clock: PlayClock {
                total,
                ..PlayClock::default()
            },
        }
    }
}

impl AudioElement for ClockAudio {
    fn current_time(&self) -> f64 {
        self.clock.position().as_secs_f64()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.clock.reset_to(seconds_to_duration(seconds));
    }

    fn play(&mut self) {
        self.clock.start();
    }

    fn pause(&mut self) {
        self.clock.stop();
    }

    fn is_paused(&self) -> bool {
        self.clock.started_at.is_none() || self.clock.is_finished()
    }
}
