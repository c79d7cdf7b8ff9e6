use super::session::{PlaybackSession, SessionSnapshot};
use crate::audio::AudioElement;
use crate::cancellation::CancellationToken;
use crate::config::AudioBehavior;
use crate::segment::Segment;
use crate::timer::Scheduler;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Keeps the highlighted segment and the stop conditions in step with the audio playhead.
pub struct PlaybackController<A: AudioElement, S: Scheduler> {
    audio: A,
    scheduler: S,
    segments: Vec<Segment>,
    session: PlaybackSession,
    tick_interval: Duration,
    timer: Option<CancellationToken>,
    timer_id: u64,
}

impl<A: AudioElement, S: Scheduler> PlaybackController<A, S> {
    /// Take ownership of the audio element and segments, then cue the audio
    /// at the first segment that has a start time (without playing).
    pub fn new(
        audio: A,
        scheduler: S,
        segments: Vec<Segment>,
        behavior: AudioBehavior,
        tick_interval: Duration,
    ) -> Self {
        let mut controller = Self {
            audio,
            scheduler,
            segments,
            session: PlaybackSession::new(behavior),
            tick_interval,
            timer: None,
            timer_id: 0,
        };
        let first = controller.segments.iter().position(Segment::is_temporal);
        if let Some(idx) = first {
            controller.session.remember_first_visible(idx);
            controller.seek(idx, false);
        }
        info!(
            segments = controller.segments.len(),
            first_visible = ?first,
            %behavior,
            "Playback controller ready"
        );
        controller
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn is_paused(&self) -> bool {
        self.audio.is_paused()
    }

    /// The segment currently carrying the highlight, if any.
    pub fn highlighted(&self) -> Option<usize> {
        self.session
            .last_played
            .filter(|idx| self.segments[*idx].is_highlighted())
    }

    /// Cue the audio at a segment's start; optionally start playing from there.
    /// Segments without a non-negative start are ignored.
    pub fn seek(&mut self, idx: usize, start_playing: bool) {
        let Some(segment) = self.segments.get(idx) else {
            return;
        };
        let Some(start) = segment.seekable_start() else {
            debug!(idx, "Segment has no start time; ignoring seek");
            return;
        };
        self.session.current_position = start;
        self.session.current_end = segment.end;
        self.audio.set_current_time(start);
        if start_playing {
            self.start_playback();
        }
        info!(
            idx,
            position = start,
            current_end = ?self.session.current_end,
            "Setting start segment"
        );
    }

    /// A click on a segment plays from its start.
    pub fn click(&mut self, idx: usize) {
        if idx >= self.segments.len() {
            warn!(
                idx,
                count = self.segments.len(),
                "Click outside the segment list"
            );
            return;
        }
        self.seek(idx, true);
    }

    pub fn start_playback(&mut self) {
        self.restart_timer();
        self.audio.play();
    }

    /// Cancel the polling timer and pause. Safe to call when already stopped.
    pub fn stop_playback(&mut self) {
        self.cancel_timer();
        if !self.audio.is_paused() {
            self.audio.pause();
        }
    }

    /// The audio started playing on its own (e.g. a play control outside the
    /// segment list); make sure exactly one polling timer runs.
    pub fn on_play(&mut self) {
        self.restart_timer();
    }

    /// Resume the audio where it is, the way a native play control would.
    pub fn resume(&mut self) {
        self.audio.play();
        self.on_play();
    }

    /// Fast poll: mirror the playhead and stop at span or content boundaries.
    pub fn playhead_tick(&mut self) {
        let position = self.audio.current_time();
        self.session.current_position = position;

        if !self.audio.is_paused() && self.session.is_bounded() {
            if let Some(end) = self.session.current_end {
                if position >= end {
                    info!(position, end, "Stopping audio at halfline boundary");
                    self.stop_playback();
                }
            }
        }

        if !self.audio.is_paused() {
            if let Some(end) = self.last_visible_end() {
                if position >= end {
                    info!(position, end, "Stopping audio at last visible segment's end");
                    self.stop_playback();
                }
            }
        }
    }

    /// Mark the latest segment whose start has been reached; clear the rest.
    pub fn highlight_sweep(&mut self) {
        let position = self.audio.current_time();
        self.session.current_position = position;

        for idx in 0..self.segments.len() {
            let Some(start) = self.segments[idx].seekable_start() else {
                continue;
            };
            if position >= start {
                self.segments[idx].set_highlighted(true);
                if let Some(previous) = self.session.last_played {
                    if previous != idx {
                        self.segments[previous].set_highlighted(false);
                    }
                }
                self.session.last_played = Some(idx);
            } else {
                self.segments[idx].set_highlighted(false);
            }
            self.session.last_visible = Some(idx);
        }
        trace!(position, highlighted = ?self.highlighted(), "Highlight sweep");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let highlighted = self.highlighted();
        SessionSnapshot {
            position: self.session.current_position,
            current_end: self.session.current_end,
            highlighted,
            highlighted_label: highlighted.map(|idx| self.segments[idx].label.clone()),
            first_visible: self.session.first_visible,
            last_visible: self.session.last_visible,
            behavior: self.session.behavior,
            playing: !self.audio.is_paused(),
            timer_active: self.timer.is_some(),
        }
    }

    pub(in crate::player) fn is_current_timer(&self, timer: u64) -> bool {
        self.timer.is_some() && timer == self.timer_id
    }

    fn last_visible_end(&self) -> Option<f64> {
        self.session
            .last_visible
            .and_then(|idx| self.segments[idx].end)
    }

    fn restart_timer(&mut self) {
        self.cancel_timer();
        self.timer_id = self.timer_id.wrapping_add(1);
        let token = self.scheduler.start(self.tick_interval, self.timer_id);
        debug!(
            timer = self.timer_id,
            interval_ms = self.tick_interval.as_millis() as u64,
            "Started playhead timer"
        );
        self.timer = Some(token);
    }

    fn cancel_timer(&mut self) {
        if let Some(token) = self.timer.take() {
            token.cancel();
            debug!(timer = self.timer_id, "Cancelled playhead timer");
        }
    }
}
