use super::defaults;
use super::models::{AppConfig, AudioBehavior, LogLevel};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    playback: PlaybackConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            audio_behavior: tables.playback.audio_behavior,
            tick_interval_ms: tables.playback.tick_interval_ms,
            time_update_interval_ms: tables.playback.time_update_interval_ms,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            playback: PlaybackConfig {
                audio_behavior: config.audio_behavior,
                tick_interval_ms: config.tick_interval_ms,
                time_update_interval_ms: config.time_update_interval_ms,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PlaybackConfig {
    #[serde(default)]
    audio_behavior: AudioBehavior,
    #[serde(default = "defaults::default_tick_interval_ms")]
    tick_interval_ms: u64,
    #[serde(default = "defaults::default_time_update_interval_ms")]
    time_update_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            audio_behavior: AudioBehavior::default(),
            tick_interval_ms: defaults::default_tick_interval_ms(),
            time_update_interval_ms: defaults::default_time_update_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
