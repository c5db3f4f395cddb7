//! # tsafe-core
//!
//! Interposition engine for the tsafe guard: aborts the process when a
//! thread-unsafe libc function is called after a second thread has been
//! created.
//!
//! The pieces, leaves first:
//! - [`resolver`]: finds and caches each function's real implementation
//! - [`gate`]: the process-wide "checking enabled" flag
//! - [`snapshot`]: immutable copy of the environment for `getenv`
//! - [`fork`]: `pthread_atfork` hooks that keep the gate consistent
//! - [`catalog`]: intercepted symbols and their dispatch policies
//! - [`guard`]: the singleton that ties them together
//!
//! The exported C symbols live in `tsafe-preload`.

// Allow unsafe FFI functions without safety docs - these are inherently unsafe C ABI
#![allow(clippy::missing_safety_doc)]

pub mod catalog;
pub mod error;
pub mod fork;
pub mod gate;
pub mod guard;
pub mod report;
pub mod resolver;
pub mod snapshot;
pub mod sync;

pub use catalog::{Descriptor, Policy, Symbol, CATALOG};
pub use error::{GuardError, Result};
pub use gate::{Gate, GateStatus};
pub use guard::{Guard, Route};
pub use resolver::{PlatformSource, RealSymbol, SymbolSource};
pub use snapshot::EnvSnapshot;

use libc::c_char;
use tsafe_config::log_guard_warn;

/// Initialize the global guard from a null-terminated environment vector.
///
/// Must run once, before untrusted callers can reach any wrapper.
pub unsafe fn init(envp: *const *const c_char) -> Result<()> {
    if envp.is_null() {
        return Err(GuardError::NullEnvironment);
    }
    init_from_snapshot(EnvSnapshot::from_environ(envp))
}

/// Initialize the global guard with a prepared snapshot.
pub fn init_from_snapshot(snapshot: EnvSnapshot) -> Result<()> {
    let guard = Guard::global();
    if guard.snapshot().is_some() {
        return Err(GuardError::AlreadyInitialized);
    }
    if let Err(rc) = fork::register_hooks() {
        log_guard_warn!("pthread_atfork failed, fork will not reset the gate", rc = rc);
    }
    guard.install(snapshot)
}

/// Resolve the always-forwarded symbols of the global guard. The preload
/// constructor runs this whether or not it initializes.
pub fn prime() {
    Guard::global().prime_forwarders()
}

/// Turn checking on for the whole process.
pub fn enable() {
    Guard::global().enable()
}

/// Turn checking off for the whole process.
pub fn disable() {
    Guard::global().disable()
}

pub fn is_checking() -> bool {
    Guard::global().is_checking()
}
