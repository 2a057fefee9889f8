//! Raw status words
//!
//! Native code stores an object's status as a single byte. That byte may be
//! one of the named [`Status`] codes, or a combination of component flags
//! accumulated while a mapping slot learns about its endpoints.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign, Not};
use core::str::FromStr;

use crate::error::StatusError;
use crate::status::{parse_byte, Status};

/// Raw status byte as exchanged with native code
///
/// Every `u8` is a valid status word.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct StatusBits(u8);

impl StatusBits {
    /// No bits set
    pub const EMPTY: StatusBits = StatusBits(0);

    /// Object expired
    pub const EXPIRED_FLAG: StatusBits = StatusBits(0x01);

    /// Object exists locally
    pub const STAGED_FLAG: StatusBits = StatusBits(0x02);

    /// Vector length of the slot's signal is known
    pub const LENGTH_KNOWN: StatusBits = StatusBits(0x04);

    /// Data type of the slot's signal is known
    pub const TYPE_KNOWN: StatusBits = StatusBits(0x08);

    /// Link to the remote device is established
    pub const LINK_KNOWN: StatusBits = StatusBits(0x10);

    /// Wrap a raw byte
    #[inline]
    pub const fn from_raw(raw: u8) -> Self {
        StatusBits(raw)
    }

    /// Get the raw byte
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Check if no bits are set
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if every bit of `other` is set in `self`
    #[inline]
    pub const fn contains(self, other: StatusBits) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check if `self` and `other` share any bit
    #[inline]
    pub const fn intersects(self, other: StatusBits) -> bool {
        self.0 & other.0 != 0
    }

    /// Check if the object has progressed at least to `status`
    ///
    /// UNDEFINED is reached by every word; ANY only by `0xFF`.
    #[inline]
    pub const fn has_reached(self, status: Status) -> bool {
        self.contains(status.bits())
    }

    /// Bitwise union
    #[inline]
    pub const fn union(self, other: StatusBits) -> StatusBits {
        StatusBits(self.0 | other.0)
    }

    /// Set the bits of `other`
    #[inline]
    pub fn insert(&mut self, other: StatusBits) {
        self.0 |= other.0;
    }

    /// Clear the bits of `other`
    #[inline]
    pub fn remove(&mut self, other: StatusBits) {
        self.0 &= !other.0;
    }

    /// The named status this word is exactly equal to, if any
    #[inline]
    pub const fn known(self) -> Option<Status> {
        Status::from_value(self.0)
    }

    /// Furthest forward lifecycle stage whose bits are all present
    pub fn stage(self) -> Status {
        Status::LIFECYCLE
            .iter()
            .rev()
            .copied()
            .find(|s| self.has_reached(*s))
            .unwrap_or(Status::Undefined)
    }

    /// At least READY
    #[inline]
    pub const fn is_ready(self) -> bool {
        self.has_reached(Status::Ready)
    }

    /// At least ACTIVE
    #[inline]
    pub const fn is_active(self) -> bool {
        self.has_reached(Status::Active)
    }

    /// EXPIRED bit set
    #[inline]
    pub const fn is_expired(self) -> bool {
        self.intersects(StatusBits::EXPIRED_FLAG)
    }
}

impl From<Status> for StatusBits {
    fn from(status: Status) -> Self {
        status.bits()
    }
}

impl From<u8> for StatusBits {
    fn from(raw: u8) -> Self {
        StatusBits(raw)
    }
}

impl From<StatusBits> for u8 {
    fn from(bits: StatusBits) -> u8 {
        bits.0
    }
}

impl BitOr for StatusBits {
    type Output = StatusBits;

    fn bitor(self, rhs: StatusBits) -> StatusBits {
        self.union(rhs)
    }
}

impl BitOr<Status> for StatusBits {
    type Output = StatusBits;

    fn bitor(self, rhs: Status) -> StatusBits {
        self.union(rhs.bits())
    }
}

impl BitOrAssign for StatusBits {
    fn bitor_assign(&mut self, rhs: StatusBits) {
        self.insert(rhs);
    }
}

impl BitAnd for StatusBits {
    type Output = StatusBits;

    fn bitand(self, rhs: StatusBits) -> StatusBits {
        StatusBits(self.0 & rhs.0)
    }
}

impl Not for StatusBits {
    type Output = StatusBits;

    fn not(self) -> StatusBits {
        StatusBits(!self.0)
    }
}

impl FromStr for StatusBits {
    type Err = StatusError;

    /// Parse a decimal or `0x` hexadecimal byte
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_byte(s)
            .map(StatusBits)
            .ok_or_else(|| StatusError::UnknownName(s.trim().to_string()))
    }
}

impl fmt::Debug for StatusBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.known() {
            Some(status) => write!(f, "StatusBits({:#04x} {})", self.0, status),
            None => write!(f, "StatusBits({:#04x})", self.0),
        }
    }
}

impl fmt::Display for StatusBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.known() {
            Some(status) => fmt::Display::fmt(&status, f),
            None => write!(f, "{:#04x}", self.0),
        }
    }
}
