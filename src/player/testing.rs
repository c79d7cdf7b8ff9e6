//! Test doubles for the playback controller.

use super::controller::PlaybackController;
use crate::audio::AudioElement;
use crate::cancellation::CancellationToken;
use crate::config::AudioBehavior;
use crate::segment::Segment;
use crate::timer::Scheduler;
use std::time::Duration;

/// Audio element whose playhead only moves when a test sets it.
#[derive(Debug)]
pub(crate) struct FakeAudio {
    pub position: f64,
    pub paused: bool,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub seeks: Vec<f64>,
}

impl Default for FakeAudio {
    fn default() -> Self {
        Self {
            position: 0.0,
            paused: true,
            play_calls: 0,
            pause_calls: 0,
            seeks: Vec::new(),
        }
    }
}

impl AudioElement for FakeAudio {
    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.position = seconds;
        self.seeks.push(seconds);
    }

    fn play(&mut self) {
        self.paused = false;
        self.play_calls += 1;
    }

    fn pause(&mut self) {
        self.paused = true;
        self.pause_calls += 1;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

/// Scheduler that hands out tokens without spawning anything.
#[derive(Debug, Default)]
pub(crate) struct ManualScheduler {
    tokens: Vec<CancellationToken>,
    pub timers: Vec<u64>,
}

impl ManualScheduler {
    pub fn issued(&self) -> usize {
        self.tokens.len()
    }

    pub fn active(&self) -> usize {
        self.tokens.iter().filter(|t| !t.is_cancelled()).count()
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, _interval: Duration, timer: u64) -> CancellationToken {
        let token = CancellationToken::new();
        self.tokens.push(token.clone());
        self.timers.push(timer);
        token
    }
}

pub(crate) fn controller_with(
    segments: Vec<Segment>,
    behavior: AudioBehavior,
) -> PlaybackController<FakeAudio, ManualScheduler> {
    PlaybackController::new(
        FakeAudio::default(),
        ManualScheduler::default(),
        segments,
        behavior,
        Duration::from_millis(15),
    )
}

/// Segments with the given start times and no end times.
pub(crate) fn starts(values: &[Option<f64>]) -> Vec<Segment> {
    values
        .iter()
        .enumerate()
        .map(|(idx, start)| match start {
            Some(start) => Segment::timed(idx.to_string(), format!("segment {idx}"), *start, None),
            None => Segment::new(idx.to_string(), format!("segment {idx}")),
        })
        .collect()
}
