//! # mpr-status
//!
//! Status codes for libmapper objects (devices, signals, maps).
//!
//! The eight codes are fixed bit patterns shared with the native library.
//! Later lifecycle stages carry a superset of STAGED's bit, so "has this
//! object reached at least READY" is a mask test on the raw status byte.
//!
//! ## Modules
//!
//! - `status` - The closed `Status` enumeration and its stable values
//! - `bits` - `StatusBits`, the raw status byte with containment queries
//! - `cell` - `StatusCell`, an object's status shared across threads
//! - `events` - `TransitionLog`, a bounded record of status changes
//! - `error` - Error types
//! - `config` - Runtime configuration and environment helpers
//! - `log` - Leveled stderr logging macros
//!
//! ## Example
//!
//! ```
//! use mpr_status::{Status, StatusBits, StatusCell};
//!
//! assert_eq!(Status::Ready.value(), 0x36);
//!
//! let word = StatusBits::from_raw(0x7E);
//! assert!(word.has_reached(Status::Ready));
//!
//! let map = StatusCell::with_status(Status::Ready);
//! map.transition(Status::Ready, Status::Active).unwrap();
//! assert!(map.is_active());
//! ```

pub mod log;

pub mod status;
pub mod bits;
pub mod cell;
pub mod events;
pub mod error;
pub mod config;

// Re-exports for convenience
pub use status::Status;
pub use bits::StatusBits;
pub use cell::StatusCell;
pub use events::{Transition, TransitionLog};
pub use error::{StatusError, StatusResult};
pub use config::StatusConfig;
pub use log::{set_log_level, LogLevel};
