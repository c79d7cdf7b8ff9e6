//! Timed text segments.
//!
//! A segment is one unit of displayed text (a half-line of verse, a subtitle
//! cue) with optional `start`/`end` times in seconds. Segments without a
//! usable `start` are non-temporal and are ignored by seek, highlight and
//! stop logic.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub label: String,
    pub text: String,
    pub start: Option<f64>,
    pub end: Option<f64>,
    #[serde(skip)]
    highlighted: bool,
}

impl Segment {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            start: None,
            end: None,
            highlighted: false,
        }
    }

    pub fn timed(
        label: impl Into<String>,
        text: impl Into<String>,
        start: f64,
        end: Option<f64>,
    ) -> Self {
        Self {
            start: Some(start),
            end,
            ..Self::new(label, text)
        }
    }

    /// Build a segment from raw attribute strings; unparsable values are treated as absent.
    pub fn from_attributes(
        label: impl Into<String>,
        text: impl Into<String>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Self {
        Self {
            start: start.and_then(parse_seconds),
            end: end.and_then(parse_seconds),
            ..Self::new(label, text)
        }
    }

    /// The start time, if this segment takes part in time-based logic.
    pub fn seekable_start(&self) -> Option<f64> {
        self.start.filter(|start| *start >= 0.0)
    }

    pub fn is_temporal(&self) -> bool {
        self.seekable_start().is_some()
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }
}

fn parse_seconds(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| !value.is_nan())
}
