//! Shared status of one mapped object
//!
//! A device starts STAGED, becomes READY once its name is registered, and a
//! map only moves READY -> ACTIVE if it is exactly READY at that moment.
//! Mapping slots accumulate component flags into the same word. All of those
//! updates go through [`StatusCell`], which may be read and written from any
//! thread.

use core::fmt;
use std::sync::Arc;

use crate::bits::StatusBits;
use crate::error::{StatusError, StatusResult};
use crate::events::{Transition, TransitionLog};
use crate::mpr_debug;
use crate::status::Status;

// Storage for the status byte
cfg_if::cfg_if! {
    if #[cfg(target_has_atomic = "8")] {
        use std::sync::atomic::{AtomicU8, Ordering};

        struct Word(AtomicU8);

        impl Word {
            fn new(v: u8) -> Self {
                Word(AtomicU8::new(v))
            }

            #[inline]
            fn load(&self) -> u8 {
                self.0.load(Ordering::Acquire)
            }

            #[inline]
            fn swap(&self, v: u8) -> u8 {
                self.0.swap(v, Ordering::AcqRel)
            }

            #[inline]
            fn fetch_or(&self, v: u8) -> u8 {
                self.0.fetch_or(v, Ordering::AcqRel)
            }

            #[inline]
            fn compare_exchange(&self, current: u8, new: u8) -> Result<u8, u8> {
                self.0.compare_exchange(current, new, Ordering::AcqRel, Ordering::Acquire)
            }
        }
    } else {
        use std::sync::{Mutex, MutexGuard};

        struct Word(Mutex<u8>);

        impl Word {
            fn new(v: u8) -> Self {
                Word(Mutex::new(v))
            }

            fn lock(&self) -> MutexGuard<'_, u8> {
                // A u8 cannot be left half-written
                self.0.lock().unwrap_or_else(|e| e.into_inner())
            }

            fn load(&self) -> u8 {
                *self.lock()
            }

            fn swap(&self, v: u8) -> u8 {
                core::mem::replace(&mut *self.lock(), v)
            }

            fn fetch_or(&self, v: u8) -> u8 {
                let mut guard = self.lock();
                let prev = *guard;
                *guard = prev | v;
                prev
            }

            fn compare_exchange(&self, current: u8, new: u8) -> Result<u8, u8> {
                let mut guard = self.lock();
                if *guard == current {
                    *guard = new;
                    Ok(current)
                } else {
                    Err(*guard)
                }
            }
        }
    }
}

/// Status word of a single object
pub struct StatusCell {
    word: Word,
    log: Option<Arc<TransitionLog>>,
}

impl StatusCell {
    /// Create a cell in the UNDEFINED state
    pub fn new() -> Self {
        Self::with_status(Status::Undefined)
    }

    pub fn with_status(status: Status) -> Self {
        Self {
            word: Word::new(status.value()),
            log: None,
        }
    }

    /// Record every effective change to `log`
    pub fn with_log(mut self, log: Arc<TransitionLog>) -> Self {
        self.log = Some(log);
        self
    }

    #[inline]
    pub fn load(&self) -> StatusBits {
        StatusBits::from_raw(self.word.load())
    }

    /// The named status currently held, if the word is exactly one
    #[inline]
    pub fn status(&self) -> Option<Status> {
        self.load().known()
    }

    /// Store `status` unconditionally; returns the previous word
    pub fn set(&self, status: Status) -> StatusBits {
        let prev = StatusBits::from_raw(self.word.swap(status.value()));
        self.note(prev, status.bits());
        prev
    }

    /// Mark the object as created locally but not yet announced
    pub fn stage(&self) -> StatusBits {
        self.set(Status::Staged)
    }

    /// Mark the object as expired
    pub fn expire(&self) -> StatusBits {
        self.set(Status::Expired)
    }

    /// Set the bits of `bits`; returns the new word
    pub fn insert(&self, bits: StatusBits) -> StatusBits {
        let prev = StatusBits::from_raw(self.word.fetch_or(bits.raw()));
        let next = prev | bits;
        self.note(prev, next);
        next
    }

    /// Move from exactly `from` to `to`
    ///
    /// Fails without changing the word if it does not equal `from`.
    pub fn transition(&self, from: Status, to: Status) -> StatusResult<()> {
        match self.word.compare_exchange(from.value(), to.value()) {
            Ok(_) => {
                self.note(from.bits(), to.bits());
                Ok(())
            }
            Err(found) => Err(StatusError::Mismatch {
                expected: from,
                found: StatusBits::from_raw(found),
            }),
        }
    }

    /// Advance to at least the lifecycle stage `to`
    ///
    /// Bits are only ever added, so promoting to a stage the word has
    /// already reached leaves it untouched. An expired word is never
    /// advanced. Returns the new word.
    pub fn promote(&self, to: Status) -> StatusResult<StatusBits> {
        if !to.is_lifecycle() {
            return Err(StatusError::NotLifecycle(to));
        }
        let mut current = self.word.load();
        loop {
            let prev = StatusBits::from_raw(current);
            if prev.is_expired() {
                return Err(StatusError::Expired(prev));
            }
            if prev.has_reached(to) {
                return Ok(prev);
            }
            let next = prev | to;
            match self.word.compare_exchange(current, next.raw()) {
                Ok(_) => {
                    self.note(prev, next);
                    return Ok(next);
                }
                Err(found) => current = found,
            }
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.load().is_ready()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.load().is_active()
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.load().is_expired()
    }

    fn note(&self, from: StatusBits, to: StatusBits) {
        if from == to {
            return;
        }
        mpr_debug!("status {} -> {}", from, to);
        if let Some(log) = &self.log {
            log.record(Transition::new(from, to));
        }
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StatusCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusCell")
            .field("word", &self.load())
            .field("logged", &self.log.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_device_lifecycle() {
        let dev = StatusCell::new();
        assert_eq!(dev.status(), Some(Status::Undefined));
        assert!(!dev.is_ready());

        assert_eq!(dev.stage(), Status::Undefined.bits());
        assert_eq!(dev.set(Status::Ready), Status::Staged.bits());
        assert!(dev.is_ready());
        assert!(!dev.is_active());
    }

    #[test]
    fn test_map_activation_requires_ready() {
        let map = StatusCell::with_status(Status::Waiting);
        let err = map.transition(Status::Ready, Status::Active).unwrap_err();
        assert_eq!(
            err,
            StatusError::Mismatch {
                expected: Status::Ready,
                found: Status::Waiting.bits(),
            }
        );
        assert_eq!(map.status(), Some(Status::Waiting));

        map.set(Status::Ready);
        assert!(map.transition(Status::Ready, Status::Active).is_ok());
        assert!(map.is_active());
    }

    #[test]
    fn test_slot_flags_accumulate() {
        let slot = StatusCell::with_status(Status::Staged);
        slot.insert(StatusBits::LENGTH_KNOWN);
        assert_eq!(slot.status(), None);
        let word = slot.insert(StatusBits::TYPE_KNOWN);
        assert_eq!(word.known(), Some(Status::Waiting));
    }

    #[test]
    fn test_promote() {
        let cell = StatusCell::with_status(Status::Waiting);
        let word = cell.promote(Status::Ready).unwrap();
        assert_eq!(word.raw(), 0x3E);
        assert_eq!(word.stage(), Status::Ready);

        // already reached: unchanged
        assert_eq!(cell.promote(Status::Staged).unwrap(), word);

        assert_eq!(cell.promote(Status::Active).unwrap(), Status::Active.bits());
        assert_eq!(cell.promote(Status::Any), Err(StatusError::NotLifecycle(Status::Any)));
        assert_eq!(
            cell.promote(Status::Expired),
            Err(StatusError::NotLifecycle(Status::Expired))
        );
    }

    #[test]
    fn test_promote_rejects_expired() {
        let cell = StatusCell::with_status(Status::Expired);
        assert_eq!(
            cell.promote(Status::Ready),
            Err(StatusError::Expired(Status::Expired.bits()))
        );
        assert_eq!(cell.load(), Status::Expired.bits());
        assert!(!cell.is_ready());

        let cell = StatusCell::with_status(Status::Active);
        cell.insert(StatusBits::EXPIRED_FLAG);
        assert!(matches!(cell.promote(Status::Staged), Err(StatusError::Expired(_))));
    }

    #[test]
    fn test_expire() {
        let cell = StatusCell::with_status(Status::Active);
        assert_eq!(cell.expire(), Status::Active.bits());
        assert!(cell.is_expired());
        assert!(!cell.is_ready());
    }

    #[test]
    fn test_log_records_effective_changes() {
        let log = Arc::new(TransitionLog::new(8));
        let cell = StatusCell::new().with_log(Arc::clone(&log));

        cell.stage();
        cell.stage(); // no change
        cell.set(Status::Ready);
        cell.transition(Status::Ready, Status::Active).unwrap();
        let _ = cell.transition(Status::Ready, Status::Active); // mismatch

        let seen: Vec<String> = log.drain().iter().map(|t| t.to_string()).collect();
        assert_eq!(seen, vec!["UNDEFINED -> STAGED", "STAGED -> READY", "READY -> ACTIVE"]);
    }

    #[test]
    fn test_single_winner_on_concurrent_activation() {
        let cell = Arc::new(StatusCell::with_status(Status::Ready));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || cell.transition(Status::Ready, Status::Active).is_ok())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(cell.status(), Some(Status::Active));
    }

    #[test]
    fn test_concurrent_insert() {
        let cell = Arc::new(StatusCell::with_status(Status::Staged));
        let flags = [StatusBits::LENGTH_KNOWN, StatusBits::TYPE_KNOWN, StatusBits::LINK_KNOWN];
        let handles: Vec<_> = flags
            .into_iter()
            .map(|flag| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    cell.insert(flag);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cell.load().raw(), 0x1E);
    }
}
