//! Locale, message and string helpers that return static buffers.

use libc::{c_char, c_int, c_long, c_void};
use std::ptr;

/// Message catalogs are never consulted: callers always fall back to their
/// built-in default text.
#[cfg_attr(not(target_os = "macos"), no_mangle)]
pub unsafe extern "C" fn catgets(
    _catalog: *mut c_void,
    _set_number: c_int,
    _message_number: c_int,
    _message: *const c_char,
) -> *mut c_char {
    ptr::null_mut()
}

interpose_entry! {
    catgets(*mut c_void, c_int, c_int, *const c_char) -> *mut c_char
}

guarded! {
    /// Returns `struct lconv *`.
    fn localeconv() -> *mut c_void => Localeconv;
    fn strerror(errnum: c_int) -> *mut c_char => Strerror;
    fn strsignal(sig: c_int) -> *mut c_char => Strsignal;
    fn strtok(s: *mut c_char, delim: *const c_char) -> *mut c_char => Strtok;
    fn l64a(value: c_long) -> *mut c_char => L64a;
}
