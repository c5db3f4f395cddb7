//! `pthread_atfork` hooks for the global guard.
//!
//! The gate lock is taken before `fork` and released on both sides, so no
//! thread can be halfway through a toggle when the address space is copied.
//! These run inside `fork`; they must not log or allocate.

use crate::guard::Guard;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Once;

static REGISTER: Once = Once::new();
static REGISTER_RESULT: AtomicI32 = AtomicI32::new(0);

unsafe extern "C" fn prepare() {
    Guard::global().gate().fork_prepare()
}

unsafe extern "C" fn parent() {
    Guard::global().gate().fork_parent()
}

unsafe extern "C" fn child() {
    Guard::global().gate().fork_child()
}

/// Register the hooks once per process. Returns the `pthread_atfork` error
/// code on failure.
pub fn register_hooks() -> Result<(), i32> {
    REGISTER.call_once(|| {
        let rc = unsafe { libc::pthread_atfork(Some(prepare), Some(parent), Some(child)) };
        REGISTER_RESULT.store(rc, Ordering::Release);
    });
    match REGISTER_RESULT.load(Ordering::Acquire) {
        0 => Ok(()),
        rc => Err(rc),
    }
}
