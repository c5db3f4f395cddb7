//! C control surface for hosts that drive the guard themselves.

use libc::{c_char, c_int};
use tsafe_config::{log_preload_debug, log_preload_warn};

/// Initialize from `envp`. Returns 0 on success, `EALREADY` if the guard is
/// already initialized and `EINVAL` for a null vector.
#[no_mangle]
pub unsafe extern "C" fn tsafe_init(envp: *const *const c_char) -> c_int {
    match tsafe_core::init(envp) {
        Ok(()) => {
            log_preload_debug!("Initialized by host");
            0
        }
        Err(e) => {
            log_preload_warn!("Host initialization rejected", error = tracing::field::display(&e));
            e.errno()
        }
    }
}

#[no_mangle]
pub extern "C" fn tsafe_on() {
    tsafe_core::enable()
}

#[no_mangle]
pub extern "C" fn tsafe_off() {
    tsafe_core::disable()
}

/// 1 while calls are being checked, 0 otherwise.
#[no_mangle]
pub extern "C" fn tsafe_is_on() -> c_int {
    tsafe_core::is_checking() as c_int
}
