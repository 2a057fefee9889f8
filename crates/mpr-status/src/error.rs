//! Error types for status conversions and transitions

use core::fmt;

use crate::bits::StatusBits;
use crate::status::Status;

/// Result type for status operations
pub type StatusResult<T> = Result<T, StatusError>;

/// Errors that can occur when converting or updating a status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    /// Byte is not one of the eight status codes
    UnknownValue(u8),

    /// Integer does not fit in a status byte
    OutOfRange(i64),

    /// Text is neither a status name nor a status value
    UnknownName(String),

    /// Compare-and-set found a different status than expected
    Mismatch {
        expected: Status,
        found: StatusBits,
    },

    /// Status is not a forward lifecycle stage
    NotLifecycle(Status),

    /// Object carries the EXPIRED bit and cannot advance
    Expired(StatusBits),
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusError::UnknownValue(v) => write!(f, "unknown status value {:#04x}", v),
            StatusError::OutOfRange(v) => write!(f, "status value {} out of range", v),
            StatusError::UnknownName(s) => write!(f, "unknown status name '{}'", s),
            StatusError::Mismatch { expected, found } => {
                write!(f, "status mismatch: expected {}, found {}", expected, found)
            }
            StatusError::NotLifecycle(s) => write!(f, "{} is not a lifecycle stage", s),
            StatusError::Expired(found) => write!(f, "status {} has expired", found),
        }
    }
}

impl std::error::Error for StatusError {}
