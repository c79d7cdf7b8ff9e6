//! Synchronized playback: one audio element, a list of timed segments, and
//! the handlers that keep the highlight and stop conditions in step.
//!
//! All handlers run on the thread that owns the controller. Timers and other
//! producers only post `PlayerEvent`s; `PlaybackController::handle` applies them.

mod controller;
mod events;
mod session;
#[cfg(test)]
pub(crate) mod testing;

pub use controller::PlaybackController;
pub use events::{Flow, PlayerEvent};
pub use session::{PlaybackSession, SessionSnapshot};

#[cfg(test)]
mod tests {
    use super::testing::{controller_with, starts};
    use super::{Flow, PlayerEvent};
    use crate::config::AudioBehavior;

    #[test]
    fn ticks_from_replaced_timers_are_ignored() {
        let mut controller = controller_with(
            starts(&[Some(0.0), Some(4.0)]),
            AudioBehavior::Halfline,
        );
        controller.start_playback();
        controller.start_playback();
        let timers = controller.scheduler().timers.clone();
        assert_eq!(timers.len(), 2);

        // A stale tick must not mirror the playhead.
        controller.audio_mut().position = 2.0;
        controller.handle(PlayerEvent::Tick { timer: timers[0] });
        assert_eq!(controller.session().current_position(), 0.0);

        controller.handle(PlayerEvent::Tick { timer: timers[1] });
        assert_eq!(controller.session().current_position(), 2.0);
    }

    #[test]
    fn ticks_after_stop_are_ignored() {
        let mut controller = controller_with(starts(&[Some(0.0)]), AudioBehavior::Continuous);
        controller.start_playback();
        let timer = controller.scheduler().timers[0];
        controller.stop_playback();
        controller.audio_mut().position = 3.0;
        controller.handle(PlayerEvent::Tick { timer });
        assert_eq!(controller.session().current_position(), 0.0);
    }

    #[test]
    fn click_event_plays_from_segment() {
        let mut controller = controller_with(
            starts(&[Some(0.0), Some(4.0)]),
            AudioBehavior::Continuous,
        );
        assert_eq!(controller.handle(PlayerEvent::Click(1)), Flow::Continue);
        assert_eq!(controller.audio().position, 4.0);
        assert!(!controller.is_paused());
        assert_eq!(controller.scheduler().active(), 1);
    }

    #[test]
    fn time_update_runs_sweep() {
        let mut controller = controller_with(
            starts(&[Some(0.0), Some(4.0)]),
            AudioBehavior::Continuous,
        );
        controller.audio_mut().position = 4.5;
        controller.handle(PlayerEvent::TimeUpdate);
        assert_eq!(controller.highlighted(), Some(1));
    }

    #[test]
    fn toggle_pauses_and_resumes_in_place() {
        let mut controller = controller_with(
            starts(&[Some(0.0), Some(4.0)]),
            AudioBehavior::Continuous,
        );
        controller.handle(PlayerEvent::Click(0));
        controller.audio_mut().position = 2.0;

        controller.handle(PlayerEvent::TogglePause);
        assert!(controller.is_paused());
        assert_eq!(controller.scheduler().active(), 0);

        controller.handle(PlayerEvent::TogglePause);
        assert!(!controller.is_paused());
        assert_eq!(controller.audio().position, 2.0);
        assert_eq!(controller.scheduler().active(), 1);
    }

    #[test]
    fn play_event_restarts_timer_without_duplicates() {
        let mut controller = controller_with(starts(&[Some(0.0)]), AudioBehavior::Continuous);
        controller.handle(PlayerEvent::Play);
        controller.handle(PlayerEvent::Play);
        assert_eq!(controller.scheduler().active(), 1);
    }

    #[test]
    fn quit_stops_playback() {
        let mut controller = controller_with(starts(&[Some(0.0)]), AudioBehavior::Continuous);
        controller.handle(PlayerEvent::Click(0));
        assert_eq!(controller.handle(PlayerEvent::Quit), Flow::Quit);
        assert!(controller.is_paused());
        assert_eq!(controller.scheduler().active(), 0);
    }
}
