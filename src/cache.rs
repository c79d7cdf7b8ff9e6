//! Remembers the chosen audio behavior per timing file.
//!
//! Files are stored under `.cache/` using a hash of the timing file path as
//! the directory name to avoid filesystem issues. The format is a tiny TOML
//! file with a single `audio_behavior` field.

use crate::config::AudioBehavior;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CACHE_DIR: &str = ".cache";

#[derive(serde::Serialize, serde::Deserialize)]
struct SessionEntry {
    audio_behavior: AudioBehavior,
}

pub fn hash_dir(root: &Path, source: &Path) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(source.as_os_str().to_string_lossy().as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    root.join(hash)
}

fn session_path(root: &Path, source: &Path) -> PathBuf {
    hash_dir(root, source).join("session.toml")
}

/// Load the remembered behavior for `source`, if any.
pub fn load_behavior(source: &Path) -> Option<AudioBehavior> {
    load_behavior_in(Path::new(CACHE_DIR), source)
}

/// Persist the behavior for `source`. Failures are logged and otherwise ignored.
pub fn save_behavior(source: &Path, behavior: AudioBehavior) {
    save_behavior_in(Path::new(CACHE_DIR), source, behavior);
}

pub fn load_behavior_in(root: &Path, source: &Path) -> Option<AudioBehavior> {
    let path = session_path(root, source);
    let data = fs::read_to_string(&path).ok()?;
    match toml::from_str::<SessionEntry>(&data) {
        Ok(entry) => {
            debug!(path = %path.display(), behavior = %entry.audio_behavior, "Loaded cached behavior");
            Some(entry.audio_behavior)
        }
        Err(err) => {
            warn!(path = %path.display(), "Ignoring unreadable session cache: {err}");
            None
        }
    }
}

pub fn save_behavior_in(root: &Path, source: &Path, behavior: AudioBehavior) {
    let path = session_path(root, source);
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!(path = %parent.display(), "Failed to create cache dir: {err}");
            return;
        }
    }
    let entry = SessionEntry {
        audio_behavior: behavior,
    };
    match toml::to_string(&entry) {
        Ok(contents) => {
            if let Err(err) = fs::write(&path, contents) {
                warn!(path = %path.display(), "Failed to write session cache: {err}");
            }
        }
        Err(err) => warn!("Failed to serialize session cache: {err}"),
    }
}

/// Command-line choice first, then the remembered choice, then configuration.
pub fn resolve_behavior(
    requested: Option<AudioBehavior>,
    cached: Option<AudioBehavior>,
    configured: AudioBehavior,
) -> AudioBehavior {
    requested.or(cached).unwrap_or(configured)
}
