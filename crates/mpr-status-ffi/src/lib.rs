//! C ABI for mpr-status
//!
//! Exposes the `MPR_STATUS_*` values native headers define, plus lookup
//! helpers for native callers that only hold the raw `int`.
//!
//! All functions are total: out-of-range or unknown inputs return `0`, `-1`
//! or null rather than aborting.

use libc::{c_char, c_int};
use std::ffi::CStr;

use mpr_status::{Status, StatusBits};

// ── Status values ──

pub const MPR_STATUS_UNDEFINED: c_int = 0x00;
pub const MPR_STATUS_EXPIRED: c_int = 0x01;
pub const MPR_STATUS_STAGED: c_int = 0x02;
pub const MPR_STATUS_WAITING: c_int = 0x0E;
pub const MPR_STATUS_READY: c_int = 0x36;
pub const MPR_STATUS_ACTIVE: c_int = 0x7E;
pub const MPR_STATUS_RESERVED: c_int = 0x80;
pub const MPR_STATUS_ANY: c_int = 0xFF;

// ── Names (NUL-terminated, static) ──

const NAME_UNDEFINED: &[u8] = b"UNDEFINED\0";
const NAME_EXPIRED: &[u8] = b"EXPIRED\0";
const NAME_STAGED: &[u8] = b"STAGED\0";
const NAME_WAITING: &[u8] = b"WAITING\0";
const NAME_READY: &[u8] = b"READY\0";
const NAME_ACTIVE: &[u8] = b"ACTIVE\0";
const NAME_RESERVED: &[u8] = b"RESERVED\0";
const NAME_ANY: &[u8] = b"ANY\0";

fn c_name(status: Status) -> &'static [u8] {
    match status {
        Status::Undefined => NAME_UNDEFINED,
        Status::Expired => NAME_EXPIRED,
        Status::Staged => NAME_STAGED,
        Status::Waiting => NAME_WAITING,
        Status::Ready => NAME_READY,
        Status::Active => NAME_ACTIVE,
        Status::Reserved => NAME_RESERVED,
        Status::Any => NAME_ANY,
    }
}

#[inline]
fn word(raw: c_int) -> Option<StatusBits> {
    u8::try_from(raw).ok().map(StatusBits::from_raw)
}

/// 1 if `value` is exactly one of the `MPR_STATUS_*` codes, else 0
#[no_mangle]
pub extern "C" fn mpr_status_is_known(value: c_int) -> c_int {
    Status::try_from(value).is_ok() as c_int
}

/// Static name of `value`, or null if it is not a status code
#[no_mangle]
pub extern "C" fn mpr_status_name(value: c_int) -> *const c_char {
    match Status::try_from(value) {
        Ok(status) => c_name(status).as_ptr() as *const c_char,
        Err(_) => std::ptr::null(),
    }
}

/// Value of the status called `name` (any case, optional `MPR_STATUS_`
/// prefix), or -1
///
/// Numeric text is accepted only when it is exactly one of the codes, so
/// `"0x36"` gives READY and `"0x3e"` gives -1.
///
/// # Safety
///
/// `name` must be null or point to a NUL-terminated string valid for reads.
#[no_mangle]
pub unsafe extern "C" fn mpr_status_from_name(name: *const c_char) -> c_int {
    if name.is_null() {
        return -1;
    }
    // SAFETY: caller guarantees a valid NUL-terminated string
    let name = unsafe { CStr::from_ptr(name) };
    match name.to_str().ok().and_then(|s| s.parse::<Status>().ok()) {
        Some(status) => c_int::from(status.value()),
        None => -1,
    }
}

/// 1 if `status_word` has reached `stage`, else 0
///
/// Returns 0 if `stage` is not a status code or either argument is outside
/// 0..=255.
#[no_mangle]
pub extern "C" fn mpr_status_has_reached(status_word: c_int, stage: c_int) -> c_int {
    match (word(status_word), Status::try_from(stage)) {
        (Some(bits), Ok(stage)) => bits.has_reached(stage) as c_int,
        _ => 0,
    }
}

/// Furthest lifecycle stage reached by `status_word`, or -1 if out of range
#[no_mangle]
pub extern "C" fn mpr_status_stage(status_word: c_int) -> c_int {
    match word(status_word) {
        Some(bits) => c_int::from(bits.stage().value()),
        None => -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_constants_match_core() {
        let pairs = [
            (MPR_STATUS_UNDEFINED, Status::Undefined),
            (MPR_STATUS_EXPIRED, Status::Expired),
            (MPR_STATUS_STAGED, Status::Staged),
            (MPR_STATUS_WAITING, Status::Waiting),
            (MPR_STATUS_READY, Status::Ready),
            (MPR_STATUS_ACTIVE, Status::Active),
            (MPR_STATUS_RESERVED, Status::Reserved),
            (MPR_STATUS_ANY, Status::Any),
        ];
        for (c, status) in pairs {
            assert_eq!(c, c_int::from(status.value()), "{}", status);
        }
    }

    #[test]
    fn test_is_known() {
        assert_eq!(mpr_status_is_known(MPR_STATUS_READY), 1);
        assert_eq!(mpr_status_is_known(0x3E), 0);
        assert_eq!(mpr_status_is_known(-1), 0);
        assert_eq!(mpr_status_is_known(0x1FF), 0);
    }

    #[test]
    fn test_name() {
        for status in Status::iter() {
            let ptr = mpr_status_name(c_int::from(status.value()));
            assert!(!ptr.is_null());
            let name = unsafe { CStr::from_ptr(ptr) };
            assert_eq!(name.to_str().unwrap(), status.as_str());
        }
        assert!(mpr_status_name(0x03).is_null());
    }

    #[test]
    fn test_from_name() {
        let ready = CString::new("MPR_STATUS_READY").unwrap();
        assert_eq!(unsafe { mpr_status_from_name(ready.as_ptr()) }, MPR_STATUS_READY);

        let active = CString::new("active").unwrap();
        assert_eq!(unsafe { mpr_status_from_name(active.as_ptr()) }, MPR_STATUS_ACTIVE);

        let bogus = CString::new("linked").unwrap();
        assert_eq!(unsafe { mpr_status_from_name(bogus.as_ptr()) }, -1);

        let numeric = CString::new("0x36").unwrap();
        assert_eq!(unsafe { mpr_status_from_name(numeric.as_ptr()) }, MPR_STATUS_READY);

        let word = CString::new("0x3e").unwrap();
        assert_eq!(unsafe { mpr_status_from_name(word.as_ptr()) }, -1);

        assert_eq!(unsafe { mpr_status_from_name(std::ptr::null()) }, -1);
    }

    #[test]
    fn test_has_reached() {
        assert_eq!(mpr_status_has_reached(MPR_STATUS_ACTIVE, MPR_STATUS_READY), 1);
        assert_eq!(mpr_status_has_reached(MPR_STATUS_WAITING, MPR_STATUS_READY), 0);
        assert_eq!(mpr_status_has_reached(MPR_STATUS_RESERVED, MPR_STATUS_READY), 0);
        assert_eq!(mpr_status_has_reached(MPR_STATUS_ACTIVE, 0x04), 0);
        assert_eq!(mpr_status_has_reached(-1, MPR_STATUS_UNDEFINED), 0);
    }

    #[test]
    fn test_stage() {
        assert_eq!(mpr_status_stage(0x3E), MPR_STATUS_READY);
        assert_eq!(mpr_status_stage(MPR_STATUS_EXPIRED), MPR_STATUS_UNDEFINED);
        assert_eq!(mpr_status_stage(256), -1);
    }
}
