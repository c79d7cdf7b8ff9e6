//! Event loop that owns the playback controller.
//!
//! Producers (playhead timer, time updates, stdin commands, Ctrl-C) run on
//! their own threads and post `PlayerEvent`s into one channel; this loop
//! applies them in arrival order and prints highlight changes.

use crate::audio::AudioElement;
use crate::config::{AppConfig, AudioBehavior};
use crate::player::{Flow, PlaybackController, PlayerEvent};
use crate::segment::Segment;
use crate::timer::{Scheduler, ThreadScheduler, spawn_repeating};
use anyhow::{Context, Result};
use std::io::BufRead;
use std::sync::mpsc::{self, Sender};
use std::thread;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Start playing from the first timed segment instead of waiting for a command.
    pub autoplay: bool,
    /// Print a JSON session snapshot whenever the highlight or play state changes.
    pub json: bool,
}

pub fn run_player<A: AudioElement>(
    audio: A,
    segments: Vec<Segment>,
    behavior: AudioBehavior,
    config: &AppConfig,
    options: RunOptions,
) -> Result<()> {
    let (tx, rx) = mpsc::channel::<PlayerEvent>();
    let mut controller = PlaybackController::new(
        audio,
        ThreadScheduler::new(tx.clone()),
        segments,
        behavior,
        config.tick_interval(),
    );
    print_segments(controller.segments());

    let time_updates = spawn_repeating(
        "time-update",
        config.time_update_interval(),
        PlayerEvent::TimeUpdate,
        tx.clone(),
    )?;
    spawn_command_reader(tx.clone())?;
    let quit_tx = tx.clone();
    ctrlc::set_handler(move || {
        let _ = quit_tx.send(PlayerEvent::Quit);
    })
    .context("Installing Ctrl-C handler")?;
    drop(tx);

    if options.autoplay {
        match controller.session().first_visible() {
            Some(idx) => controller.click(idx),
            None => warn!("Nothing to autoplay: no segment has a start time"),
        }
    }

    info!("Player loop running; enter a segment number, `p` to pause/resume, `q` to quit");
    let result = event_loop(&mut controller, rx, options);
    time_updates.cancel();
    result
}

fn event_loop<A: AudioElement, S: Scheduler>(
    controller: &mut PlaybackController<A, S>,
    events: mpsc::Receiver<PlayerEvent>,
    options: RunOptions,
) -> Result<()> {
    let mut shown = controller.highlighted();
    let mut playing = !controller.is_paused();

    for event in events.iter() {
        let flow = controller.handle(event);

        let highlighted = controller.highlighted();
        let now_playing = !controller.is_paused();
        let changed = highlighted != shown || now_playing != playing;
        if highlighted != shown {
            if let Some(idx) = highlighted {
                let segment = &controller.segments()[idx];
                println!("> [{}] {}", idx + 1, segment.text);
            }
            shown = highlighted;
        }
        playing = now_playing;
        if options.json && changed {
            let line =
                serde_json::to_string(&controller.snapshot()).context("Serializing snapshot")?;
            println!("{line}");
        }

        if flow == Flow::Quit {
            info!("Quit requested");
            break;
        }
    }
    Ok(())
}

fn print_segments(segments: &[Segment]) {
    for (idx, segment) in segments.iter().enumerate() {
        let timing = match (segment.seekable_start(), segment.end) {
            (Some(start), Some(end)) => format!("{start:.2}-{end:.2}"),
            (Some(start), None) => format!("{start:.2}-"),
            _ => "untimed".to_string(),
        };
        println!("{:>4}. [{}] {} ({timing})", idx + 1, segment.label, segment.text);
    }
}

fn spawn_command_reader(events: Sender<PlayerEvent>) -> Result<()> {
    thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                match parse_command(&line) {
                    Some(event) => {
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                    None => {
                        if !line.trim().is_empty() {
                            warn!(input = %line.trim(), "Unrecognized command");
                        }
                    }
                }
            }
            debug!("Command reader finished");
        })
        .context("Spawning stdin reader")?;
    Ok(())
}

/// Map a line of user input to a player event. Segment numbers are 1-based.
pub fn parse_command(line: &str) -> Option<PlayerEvent> {
    match line.trim() {
        "q" | "quit" => Some(PlayerEvent::Quit),
        "p" | "pause" | "play" => Some(PlayerEvent::TogglePause),
        other => other
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .map(|n| PlayerEvent::Click(n - 1)),
    }
}
