//! Thread creation arms the guard; `dlerror` must keep working regardless.

use libc::c_char;

#[cfg(any(target_os = "linux", target_os = "android", target_vendor = "apple"))]
use libc::{c_int, c_void, pthread_attr_t, pthread_t};

#[cfg(any(target_os = "linux", target_os = "android", target_vendor = "apple"))]
guarded! {
    /// Enables checking for the rest of the process, then spawns.
    fn pthread_create(
        thread: *mut pthread_t,
        attr: *const pthread_attr_t,
        start: extern "C" fn(*mut c_void) -> *mut c_void,
        arg: *mut c_void,
    ) -> c_int => PthreadCreate;
}

guarded! {
    fn dlerror() -> *mut c_char => Dlerror;
}
