use crate::config::AudioBehavior;
use serde::Serialize;

/// Mutable playback state shared by the tick, sweep and click handlers.
///
/// Segment references are indices into the controller's segment list.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub(in crate::player) current_position: f64,
    pub(in crate::player) current_end: Option<f64>,
    pub(in crate::player) last_played: Option<usize>,
    pub(in crate::player) last_visible: Option<usize>,
    pub(in crate::player) first_visible: Option<usize>,
    pub(in crate::player) behavior: AudioBehavior,
}

impl PlaybackSession {
    pub(in crate::player) fn new(behavior: AudioBehavior) -> Self {
        Self {
            current_position: 0.0,
            current_end: None,
            last_played: None,
            last_visible: None,
            first_visible: None,
            behavior,
        }
    }

    pub fn current_position(&self) -> f64 {
        self.current_position
    }

    pub fn current_end(&self) -> Option<f64> {
        self.current_end
    }

    pub fn last_played(&self) -> Option<usize> {
        self.last_played
    }

    pub fn last_visible(&self) -> Option<usize> {
        self.last_visible
    }

    pub fn first_visible(&self) -> Option<usize> {
        self.first_visible
    }

    pub fn behavior(&self) -> AudioBehavior {
        self.behavior
    }

    pub(in crate::player) fn is_bounded(&self) -> bool {
        self.behavior == AudioBehavior::Halfline
    }

    /// Record the first segment with a start time; later calls are ignored.
    pub(in crate::player) fn remember_first_visible(&mut self, idx: usize) -> bool {
        if self.first_visible.is_some() {
            return false;
        }
        self.first_visible = Some(idx);
        true
    }
}

/// Serializable view of the session for status output.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub position: f64,
    pub current_end: Option<f64>,
    pub highlighted: Option<usize>,
    pub highlighted_label: Option<String>,
    pub first_visible: Option<usize>,
    pub last_visible: Option<usize>,
    pub behavior: AudioBehavior,
    pub playing: bool,
    pub timer_active: bool,
}

#[cfg(test)]
mod tests {
    use super::PlaybackSession;
    use crate::config::AudioBehavior;

    #[test]
    fn first_visible_is_set_once() {
        let mut session = PlaybackSession::new(AudioBehavior::Continuous);
        assert!(session.remember_first_visible(2));
        assert!(!session.remember_first_visible(5));
        assert_eq!(session.first_visible(), Some(2));
    }

    #[test]
    fn only_halfline_bounds_playback() {
        assert!(PlaybackSession::new(AudioBehavior::Halfline).is_bounded());
        assert!(!PlaybackSession::new(AudioBehavior::Continuous).is_bounded());
    }
}
