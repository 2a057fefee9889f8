//! Status codes for libmapper objects
//!
//! Each code is a fixed bit pattern shared with the native library. Later
//! lifecycle stages set a superset of STAGED's bit, so "has reached at least
//! stage X" is a mask test on the raw word (see [`StatusBits`]) rather than
//! an equality check.
//!
//! | Name      | Value |
//! |-----------|-------|
//! | UNDEFINED | 0x00  |
//! | EXPIRED   | 0x01  |
//! | STAGED    | 0x02  |
//! | WAITING   | 0x0E  |
//! | READY     | 0x36  |
//! | ACTIVE    | 0x7E  |
//! | RESERVED  | 0x80  |
//! | ANY       | 0xFF  |

use core::fmt;
use core::str::FromStr;

use crate::bits::StatusBits;
use crate::error::StatusError;

/// Status of a libmapper object
///
/// The discriminants are an interoperability contract and must never be
/// renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    /// Nothing known about the object yet
    Undefined = 0x00,

    /// Object timed out or was released
    Expired = 0x01,

    /// Created locally, not yet announced
    Staged = 0x02,

    /// Announced, waiting for length and type of its endpoints
    Waiting = 0x0E,

    /// All prerequisites known, ready to be activated
    Ready = 0x36,

    /// Established and carrying data
    Active = 0x7E,

    /// Reserved sentinel
    Reserved = 0x80,

    /// Matches every status; used for queries
    Any = 0xFF,
}

// Compiled drift guard: the table above is part of the native ABI.
const _: () = {
    assert!(Status::Undefined as u8 == 0x00);
    assert!(Status::Expired as u8 == 0x01);
    assert!(Status::Staged as u8 == 0x02);
    assert!(Status::Waiting as u8 == 0x0E);
    assert!(Status::Ready as u8 == 0x36);
    assert!(Status::Active as u8 == 0x7E);
    assert!(Status::Reserved as u8 == 0x80);
    assert!(Status::Any as u8 == 0xFF);
};

impl Status {
    /// Number of status codes
    pub const COUNT: usize = 8;

    /// Every status code, in table order
    pub const ALL: [Status; Status::COUNT] = [
        Status::Undefined,
        Status::Expired,
        Status::Staged,
        Status::Waiting,
        Status::Ready,
        Status::Active,
        Status::Reserved,
        Status::Any,
    ];

    /// Forward lifecycle stages, earliest first
    pub const LIFECYCLE: [Status; 5] = [
        Status::Undefined,
        Status::Staged,
        Status::Waiting,
        Status::Ready,
        Status::Active,
    ];

    /// Get the raw value shared with native code
    #[inline]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Look up a status by its exact raw value
    ///
    /// Bytes that are not one of the eight codes return `None`.
    pub const fn from_value(value: u8) -> Option<Status> {
        match value {
            0x00 => Some(Status::Undefined),
            0x01 => Some(Status::Expired),
            0x02 => Some(Status::Staged),
            0x0E => Some(Status::Waiting),
            0x36 => Some(Status::Ready),
            0x7E => Some(Status::Active),
            0x80 => Some(Status::Reserved),
            0xFF => Some(Status::Any),
            _ => None,
        }
    }

    /// Canonical upper-case name
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Undefined => "UNDEFINED",
            Status::Expired => "EXPIRED",
            Status::Staged => "STAGED",
            Status::Waiting => "WAITING",
            Status::Ready => "READY",
            Status::Active => "ACTIVE",
            Status::Reserved => "RESERVED",
            Status::Any => "ANY",
        }
    }

    /// The raw word holding exactly this status
    #[inline]
    pub const fn bits(self) -> StatusBits {
        StatusBits::from_raw(self as u8)
    }

    /// Check if this is an out-of-band sentinel (RESERVED or ANY)
    #[inline]
    pub const fn is_sentinel(self) -> bool {
        matches!(self, Status::Reserved | Status::Any)
    }

    /// Check if this is a forward lifecycle stage (UNDEFINED through ACTIVE)
    #[inline]
    pub const fn is_lifecycle(self) -> bool {
        matches!(
            self,
            Status::Undefined | Status::Staged | Status::Waiting | Status::Ready | Status::Active
        )
    }

    /// Check if the object has expired
    #[inline]
    pub const fn is_expired(self) -> bool {
        matches!(self, Status::Expired)
    }

    /// Iterator over all status codes in table order
    pub fn iter() -> impl Iterator<Item = Status> {
        Status::ALL.into_iter()
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Undefined
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        status as u8
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> i32 {
        status as u8 as i32
    }
}

impl TryFrom<u8> for Status {
    type Error = StatusError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Status::from_value(value).ok_or(StatusError::UnknownValue(value))
    }
}

impl TryFrom<i32> for Status {
    type Error = StatusError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        let byte = u8::try_from(value).map_err(|_| StatusError::OutOfRange(value.into()))?;
        Status::try_from(byte)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Status {
    type Err = StatusError;

    /// Parse a name (any case, optional `MPR_STATUS_` or `STATUS_` prefix)
    /// or a numeric literal that is exactly one of the codes.
    ///
    /// A literal that fits a byte but matches no code fails with
    /// [`StatusError::UnknownValue`]; anything else unrecognised fails with
    /// [`StatusError::UnknownName`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();
        let name = upper
            .strip_prefix("MPR_STATUS_")
            .or_else(|| upper.strip_prefix("STATUS_"))
            .unwrap_or(&upper);

        if let Some(status) = Status::iter().find(|st| st.as_str() == name) {
            return Ok(status);
        }

        match parse_byte(trimmed) {
            Some(value) => Status::from_value(value).ok_or(StatusError::UnknownValue(value)),
            None => Err(StatusError::UnknownName(trimmed.to_string())),
        }
    }
}

/// Parse a decimal or `0x` hexadecimal byte
pub(crate) fn parse_byte(s: &str) -> Option<u8> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}
