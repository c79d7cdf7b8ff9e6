//! Synchronized audio/text reader.
//!
//! Timed text segments are loaded from `.ass` timing files (optionally joined
//! with a token document), and a `PlaybackController` keeps the highlighted
//! segment and the stop conditions in step with an audio playhead.

pub mod audio;
pub mod cache;
pub mod cancellation;
pub mod config;
pub mod document;
pub mod player;
pub mod runtime;
pub mod segment;
pub mod timer;
pub mod timing;
