/// Fast enough that a stop boundary is caught well before it is audible.
pub(crate) fn default_tick_interval_ms() -> u64 {
    15
}

pub(crate) fn default_time_update_interval_ms() -> u64 {
    250
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}
