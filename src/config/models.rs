use serde::Deserialize;
use std::time::Duration;

/// High-level reader configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub audio_behavior: AudioBehavior,
    #[serde(default = "crate::config::defaults::default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_time_update_interval_ms")]
    pub time_update_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            audio_behavior: AudioBehavior::default(),
            tick_interval_ms: crate::config::defaults::default_tick_interval_ms(),
            time_update_interval_ms: crate::config::defaults::default_time_update_interval_ms(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

impl AppConfig {
    /// Cadence of the playhead polling timer.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Cadence of the simulated native position updates that drive highlighting.
    pub fn time_update_interval(&self) -> Duration {
        Duration::from_millis(self.time_update_interval_ms.max(1))
    }
}

/// What playback does when the active segment's end boundary is reached.
///
/// Only `"halfline"` is recognized as the bounded-span mode; every other value
/// keeps playing through segment boundaries.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum AudioBehavior {
    Halfline,
    #[default]
    Continuous,
}

impl From<&str> for AudioBehavior {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("halfline") {
            AudioBehavior::Halfline
        } else {
            AudioBehavior::Continuous
        }
    }
}

impl From<String> for AudioBehavior {
    fn from(value: String) -> Self {
        AudioBehavior::from(value.as_str())
    }
}

impl From<AudioBehavior> for String {
    fn from(value: AudioBehavior) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for AudioBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AudioBehavior::Halfline => "halfline",
            AudioBehavior::Continuous => "continuous",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Debug
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AudioBehavior;

    #[test]
    fn only_halfline_is_bounded() {
        assert_eq!(AudioBehavior::from("halfline"), AudioBehavior::Halfline);
        assert_eq!(AudioBehavior::from(" HalfLine "), AudioBehavior::Halfline);
        assert_eq!(AudioBehavior::from("continuous"), AudioBehavior::Continuous);
        assert_eq!(AudioBehavior::from("line"), AudioBehavior::Continuous);
        assert_eq!(AudioBehavior::from(""), AudioBehavior::Continuous);
    }
}
