//! Environment access. Once checking is on, `getenv` answers from the
//! snapshot taken at init and every mutator aborts.

use libc::{c_char, c_int};
use tsafe_core::{Guard, Route, Symbol};

/// Pointers returned from the snapshot stay valid for the life of the process.
#[cfg_attr(not(target_os = "macos"), no_mangle)]
pub unsafe extern "C" fn getenv(name: *const c_char) -> *mut c_char {
    let guard = Guard::global();
    match guard.route(Symbol::Getenv) {
        Route::Snapshot => guard.snapshot_getenv(name),
        _ => {
            let real = std::mem::transmute::<*mut libc::c_void, unsafe extern "C" fn(*const c_char) -> *mut c_char>(
                guard.require_real(Symbol::Getenv).as_ptr(),
            );
            real(name)
        }
    }
}

interpose_entry! {
    getenv(*const c_char) -> *mut c_char
}

guarded! {
    fn setenv(name: *const c_char, value: *const c_char, overwrite: c_int) -> c_int => Setenv;
    fn unsetenv(name: *const c_char) -> c_int => Unsetenv;
    fn putenv(string: *mut c_char) -> c_int => Putenv;
}
