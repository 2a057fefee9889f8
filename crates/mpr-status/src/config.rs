//! Runtime configuration
//!
//! # Environment Variables
//!
//! - `MPR_LOG_CAPACITY=<n>` - Transition log capacity (default 256)
//! - `MPR_LOG_LEVEL=<level>` - Log level (default info)
//! - `MPR_FLUSH_LOG=1` - Flush stderr after each log line

use std::str::FromStr;
use std::sync::Arc;

use crate::events::TransitionLog;
use crate::log::{self, LogLevel};

/// Default transition log capacity
pub const DEFAULT_LOG_CAPACITY: usize = 256;

/// Parse an environment variable as `T`, falling back to `default`
///
/// Unset and unparsable values both yield the default.
#[inline]
pub fn env_get<T: FromStr>(key: &str, default: T) -> T {
    env_get_opt(key).unwrap_or(default)
}

/// Parse an environment variable as `T`
#[inline]
pub fn env_get_opt<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Read an environment flag
///
/// "1", "true", "yes" and "on" (any case) are true, anything else set is false.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// Configuration for status tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusConfig {
    /// Capacity of transition logs built from this config
    pub log_capacity: usize,

    /// Minimum level emitted by the `mpr_*!` macros
    pub log_level: LogLevel,

    /// Flush stderr after each log line
    pub flush_log: bool,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
            log_level: LogLevel::Info,
            flush_log: false,
        }
    }
}

impl StatusConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `MPR_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_capacity: env_get("MPR_LOG_CAPACITY", defaults.log_capacity).max(1),
            log_level: env_get("MPR_LOG_LEVEL", defaults.log_level),
            flush_log: env_get_bool("MPR_FLUSH_LOG", defaults.flush_log),
        }
    }

    /// Set transition log capacity (minimum 1)
    pub fn log_capacity(mut self, n: usize) -> Self {
        self.log_capacity = n.max(1);
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn flush_log(mut self, enabled: bool) -> Self {
        self.flush_log = enabled;
        self
    }

    /// Install the log settings process-wide
    pub fn apply(&self) {
        log::set_log_level(self.log_level);
        log::set_flush_enabled(self.flush_log);
    }

    /// Build a transition log of the configured capacity
    pub fn transition_log(&self) -> Arc<TransitionLog> {
        Arc::new(TransitionLog::new(self.log_capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StatusConfig::default();
        assert_eq!(config.log_capacity, DEFAULT_LOG_CAPACITY);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(!config.flush_log);
    }

    #[test]
    fn test_builder() {
        let config = StatusConfig::new()
            .log_capacity(0)
            .log_level(LogLevel::Debug)
            .flush_log(true);
        assert_eq!(config.log_capacity, 1);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.flush_log);
        assert_eq!(config.transition_log().capacity(), 1);
    }

    #[test]
    fn test_env_helpers_unset() {
        let key = "__MPR_TEST_UNSET_VAR__";
        assert_eq!(env_get(key, 7usize), 7);
        assert_eq!(env_get_opt::<usize>(key), None);
        assert!(env_get_bool(key, true));
    }

    #[test]
    fn test_env_helpers_set() {
        std::env::set_var("__MPR_TEST_NUM__", " 64 ");
        assert_eq!(env_get("__MPR_TEST_NUM__", 0usize), 64);
        std::env::set_var("__MPR_TEST_NUM__", "lots");
        assert_eq!(env_get("__MPR_TEST_NUM__", 3usize), 3);
        std::env::remove_var("__MPR_TEST_NUM__");

        std::env::set_var("__MPR_TEST_FLAG__", "ON");
        assert!(env_get_bool("__MPR_TEST_FLAG__", false));
        std::env::set_var("__MPR_TEST_FLAG__", "nope");
        assert!(!env_get_bool("__MPR_TEST_FLAG__", true));
        std::env::remove_var("__MPR_TEST_FLAG__");
    }

    #[test]
    fn test_from_env() {
        let _guard = crate::log::TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        std::env::set_var("MPR_LOG_CAPACITY", "0");
        std::env::set_var("MPR_LOG_LEVEL", "debug");
        std::env::set_var("MPR_FLUSH_LOG", "yes");
        let config = StatusConfig::from_env();
        assert_eq!(config.log_capacity, 1);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.flush_log);

        std::env::set_var("MPR_LOG_CAPACITY", "many");
        std::env::set_var("MPR_LOG_LEVEL", "loud");
        std::env::remove_var("MPR_FLUSH_LOG");
        assert_eq!(StatusConfig::from_env(), StatusConfig::default());

        std::env::set_var("MPR_LOG_CAPACITY", " 32 ");
        assert_eq!(StatusConfig::from_env().log_capacity, 32);

        std::env::remove_var("MPR_LOG_CAPACITY");
        std::env::remove_var("MPR_LOG_LEVEL");
        assert_eq!(StatusConfig::from_env(), StatusConfig::default());
    }

    #[test]
    fn test_apply() {
        let _guard = crate::log::TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let saved_level = log::log_level();
        let saved_flush = log::flush_enabled();

        StatusConfig::new()
            .log_level(LogLevel::Error)
            .flush_log(true)
            .apply();
        assert_eq!(log::log_level(), LogLevel::Error);
        assert!(log::flush_enabled());
        assert!(log::level_enabled(LogLevel::Error));
        assert!(!log::level_enabled(LogLevel::Warn));

        StatusConfig::new()
            .log_level(saved_level)
            .flush_log(saved_flush)
            .apply();
    }

    #[test]
    fn test_env_level_parses() {
        std::env::set_var("__MPR_TEST_LEVEL__", "trace");
        assert_eq!(env_get("__MPR_TEST_LEVEL__", LogLevel::Info), LogLevel::Trace);
        std::env::remove_var("__MPR_TEST_LEVEL__");
    }
}
