use super::controller::PlaybackController;
use crate::audio::AudioElement;
use crate::timer::Scheduler;
use tracing::{debug, info};

/// Everything that can wake the player loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Polling timer fired; `timer` identifies which start produced it.
    Tick { timer: u64 },
    /// Native-style position update.
    TimeUpdate,
    /// A segment was clicked (zero-based index).
    Click(usize),
    /// The audio element started playing outside the controller.
    Play,
    TogglePause,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl<A: AudioElement, S: Scheduler> PlaybackController<A, S> {
    /// Route one event to the operation it triggers.
    pub fn handle(&mut self, event: PlayerEvent) -> Flow {
        match event {
            PlayerEvent::Tick { timer } => {
                if self.is_current_timer(timer) {
                    self.playhead_tick();
                } else {
                    debug!(timer, "Ignoring tick from cancelled timer");
                }
            }
            PlayerEvent::TimeUpdate => self.highlight_sweep(),
            PlayerEvent::Click(idx) => self.click(idx),
            PlayerEvent::Play => self.on_play(),
            PlayerEvent::TogglePause => {
                if self.is_paused() {
                    info!("Resuming audio");
                    self.resume();
                } else {
                    info!("Pausing audio");
                    self.stop_playback();
                }
            }
            PlayerEvent::Quit => {
                self.stop_playback();
                return Flow::Quit;
            }
        }
        Flow::Continue
    }
}
