//! Repeating event producers.
//!
//! Each producer is a thread that sleeps for its interval and posts an event
//! into the player's channel until its `CancellationToken` is cancelled or the
//! channel closes.

use crate::cancellation::CancellationToken;
use crate::player::PlayerEvent;
use anyhow::{Context, Result};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Starts polling timers on behalf of the controller.
pub trait Scheduler {
    /// Start a timer posting `PlayerEvent::Tick { timer }` every `interval`.
    /// The returned token stops it.
    fn start(&mut self, interval: Duration, timer: u64) -> CancellationToken;
}

/// Scheduler backed by one OS thread per timer.
pub struct ThreadScheduler {
    events: Sender<PlayerEvent>,
}

impl ThreadScheduler {
    pub fn new(events: Sender<PlayerEvent>) -> Self {
        Self { events }
    }
}

impl Scheduler for ThreadScheduler {
    fn start(&mut self, interval: Duration, timer: u64) -> CancellationToken {
        match spawn_repeating(
            "playhead-timer",
            interval,
            PlayerEvent::Tick { timer },
            self.events.clone(),
        ) {
            Ok(token) => token,
            Err(err) => {
                warn!(timer, "Failed to start playhead timer: {err:#}");
                let token = CancellationToken::new();
                token.cancel();
                token
            }
        }
    }
}

/// Post `event` every `interval` on a named background thread.
pub fn spawn_repeating(
    name: &str,
    interval: Duration,
    event: PlayerEvent,
    events: Sender<PlayerEvent>,
) -> Result<CancellationToken> {
    let token = CancellationToken::new();
    let worker_token = token.clone();
    let label = name.to_string();
    thread::Builder::new()
        .name(label.clone())
        .spawn(move || {
            loop {
                thread::sleep(interval);
                if worker_token.is_cancelled() {
                    break;
                }
                if events.send(event.clone()).is_err() {
                    break;
                }
            }
            debug!(name = %label, "Repeating producer stopped");
        })
        .with_context(|| format!("Spawning {name} thread"))?;
    Ok(token)
}
