//! Entry point for the synchronized reader.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load configuration from `conf/config.toml` (or `--config`).
//! - Load the timing file and, optionally, a token document.
//! - Open the audio track and hand everything to the player loop.

use anyhow::{Context, Result, anyhow, bail};
use halfline_reader::audio::{ClockAudio, SinkAudio};
use halfline_reader::cache::{load_behavior, resolve_behavior, save_behavior};
use halfline_reader::config::{AudioBehavior, load_config};
use halfline_reader::document::{Chunk, build_segments, load_tokens};
use halfline_reader::runtime::{RunOptions, run_player};
use halfline_reader::segment::Segment;
use halfline_reader::timing::load_timing;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const USAGE: &str = "Usage: halfline-reader <timing.ass> <audio-file> [--tokens FILE] \
[--chunk fitt:N|lines:S-E] [--behavior halfline|continuous] [--config PATH] \
[--autoplay] [--silent] [--json]";

#[derive(Debug)]
struct CliArgs {
    timing: PathBuf,
    audio: Option<PathBuf>,
    tokens: Option<PathBuf>,
    chunk: Option<Chunk>,
    behavior: Option<AudioBehavior>,
    config: PathBuf,
    autoplay: bool,
    silent: bool,
    json: bool,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    let config = load_config(&args.config);
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        timing = %args.timing.display(),
        level = %config.log_level,
        tick_ms = config.tick_interval_ms,
        time_update_ms = config.time_update_interval_ms,
        "Starting reader"
    );

    let behavior = resolve_behavior(
        args.behavior,
        load_behavior(&args.timing),
        config.audio_behavior,
    );
    if args.behavior.is_some() {
        save_behavior(&args.timing, behavior);
    }
    info!(%behavior, "Active audio behavior");

    let timing = load_timing(&args.timing)?;
    let segments = match &args.tokens {
        Some(path) => build_segments(&load_tokens(path)?, &timing, args.chunk),
        None => {
            if args.chunk.is_some() {
                warn!("--chunk only applies together with --tokens; ignoring");
            }
            timing.segments()
        }
    };

    let options = RunOptions {
        autoplay: args.autoplay,
        json: args.json,
    };
    if args.silent {
        let audio = ClockAudio::new(content_duration(&segments));
        return run_player(audio, segments, behavior, &config, options);
    }
    let audio_path = args
        .audio
        .as_deref()
        .ok_or_else(|| anyhow!("Missing audio file\n{USAGE}"))?;
    let audio = SinkAudio::open(audio_path).context("Audio element unavailable")?;
    run_player(audio, segments, behavior, &config, options)
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut positional = Vec::new();
    let mut tokens = None;
    let mut chunk = None;
    let mut behavior = None;
    let mut config = PathBuf::from("conf/config.toml");
    let mut autoplay = false;
    let mut silent = false;
    let mut json = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| anyhow!("{flag} needs a value\n{USAGE}"))
        };
        match arg.as_str() {
            "--tokens" => tokens = Some(PathBuf::from(value("--tokens")?)),
            "--chunk" => chunk = Some(value("--chunk")?.parse::<Chunk>()?),
            "--behavior" => behavior = Some(AudioBehavior::from(value("--behavior")?)),
            "--config" => config = PathBuf::from(value("--config")?),
            "--autoplay" => autoplay = true,
            "--silent" => silent = true,
            "--json" => json = true,
            "-h" | "--help" => bail!("{USAGE}"),
            flag if flag.starts_with("--") => bail!("Unknown option {flag}\n{USAGE}"),
            other => positional.push(PathBuf::from(other)),
        }
    }

    let mut positional = positional.into_iter();
    let timing = positional
        .next()
        .ok_or_else(|| anyhow!("{USAGE}"))?;
    ensure_exists(&timing)?;
    let audio = positional.next();
    if let Some(path) = &audio {
        ensure_exists(path)?;
    } else if !silent {
        bail!("Missing audio file (or pass --silent)\n{USAGE}");
    }
    if let Some(path) = &tokens {
        ensure_exists(path)?;
    }

    Ok(CliArgs {
        timing,
        audio,
        tokens,
        chunk,
        behavior,
        config,
        autoplay,
        silent,
        json,
    })
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    Ok(())
}

/// Length of the silent clock: the latest end time among the segments.
fn content_duration(segments: &[Segment]) -> Option<Duration> {
    segments
        .iter()
        .filter_map(|s| s.end)
        .filter(|end| end.is_finite() && *end > 0.0)
        .fold(None, |acc: Option<f64>, end| Some(acc.map_or(end, |a| a.max(end))))
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    if env::var_os("RUST_LOG").is_some() {
        return;
    }
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
