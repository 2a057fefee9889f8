//! Leveled stderr logging for mpr-status
//!
//! # Environment Variables
//!
//! - `MPR_LOG_LEVEL=<level>` - off, error, warn, info, debug, trace (or 0-5)
//! - `MPR_FLUSH_LOG=1` - Flush stderr after each line
//!
//! # Usage
//!
//! ```ignore
//! use mpr_status::{mpr_debug, mpr_warn};
//!
//! mpr_debug!("status {} -> {}", from, to);
//! mpr_warn!("transition log full, dropped {}", n);
//! ```

use std::io::Write;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Log levels
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[mpr ERROR]",
            LogLevel::Warn => "[mpr WARN] ",
            LogLevel::Info => "[mpr INFO] ",
            LogLevel::Debug => "[mpr DEBUG]",
            LogLevel::Trace => "[mpr TRACE]",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "0" => Ok(LogLevel::Off),
            "error" | "1" => Ok(LogLevel::Error),
            "warn" | "2" => Ok(LogLevel::Warn),
            "info" | "3" => Ok(LogLevel::Info),
            "debug" | "4" => Ok(LogLevel::Debug),
            "trace" | "5" => Ok(LogLevel::Trace),
            _ => Err(()),
        }
    }
}

static FLUSH_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static INITIALIZED: AtomicBool = AtomicBool::new(false);
static LEVEL_OVERRIDDEN: AtomicBool = AtomicBool::new(false);
static FLUSH_OVERRIDDEN: AtomicBool = AtomicBool::new(false);

#[cfg(test)]
pub(crate) static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Load log settings from `MPR_LOG_LEVEL` and `MPR_FLUSH_LOG`
///
/// Runs once; called lazily on first log.
pub fn init() {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }
    load_env(
        std::env::var("MPR_FLUSH_LOG").ok().as_deref(),
        std::env::var("MPR_LOG_LEVEL").ok().as_deref(),
    );
}

// Settings made through the setters win over the environment.
fn load_env(flush: Option<&str>, level: Option<&str>) {
    if let Some(val) = flush {
        if !FLUSH_OVERRIDDEN.load(Ordering::SeqCst) {
            let on = matches!(val.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
            FLUSH_ENABLED.store(on, Ordering::Relaxed);
        }
    }

    if let Some(val) = level {
        if !LEVEL_OVERRIDDEN.load(Ordering::SeqCst) {
            let level = val.parse().unwrap_or(LogLevel::Info);
            LOG_LEVEL.store(level as u8, Ordering::Relaxed);
        }
    }
}

#[inline]
pub fn flush_enabled() -> bool {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    FLUSH_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn log_level() -> LogLevel {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Set log level programmatically (overrides `MPR_LOG_LEVEL`)
///
/// `MPR_FLUSH_LOG` is still read on first use.
pub fn set_log_level(level: LogLevel) {
    LEVEL_OVERRIDDEN.store(true, Ordering::SeqCst);
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Set flush mode programmatically (overrides `MPR_FLUSH_LOG`)
pub fn set_flush_enabled(enabled: bool) {
    FLUSH_OVERRIDDEN.store(true, Ordering::SeqCst);
    FLUSH_ENABLED.store(enabled, Ordering::Relaxed);
}

#[inline]
pub fn level_enabled(level: LogLevel) -> bool {
    level != LogLevel::Off && level <= log_level()
}

#[doc(hidden)]
pub fn _log_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = write!(handle, "{} ", level.tag());
    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");
    if flush_enabled() {
        let _ = handle.flush();
    }
}

#[macro_export]
macro_rules! mpr_error {
    ($($arg:tt)*) => {{
        $crate::log::_log_impl($crate::log::LogLevel::Error, format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! mpr_warn {
    ($($arg:tt)*) => {{
        $crate::log::_log_impl($crate::log::LogLevel::Warn, format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! mpr_info {
    ($($arg:tt)*) => {{
        $crate::log::_log_impl($crate::log::LogLevel::Info, format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! mpr_debug {
    ($($arg:tt)*) => {{
        $crate::log::_log_impl($crate::log::LogLevel::Debug, format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! mpr_trace {
    ($($arg:tt)*) => {{
        $crate::log::_log_impl($crate::log::LogLevel::Trace, format_args!($($arg)*));
    }};
}
