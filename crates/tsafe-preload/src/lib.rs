//! # tsafe-preload
//!
//! Shared library loaded with `LD_PRELOAD` (or `DYLD_INSERT_LIBRARIES` on
//! macOS). It exports a wrapper for every catalogued thread-unsafe libc
//! function plus a small control ABI:
//!
//! ```c
//! int  tsafe_init(char **envp);
//! void tsafe_on(void);
//! void tsafe_off(void);
//! int  tsafe_is_on(void);
//! ```
//!
//! Unless `guard.auto_init` is off, the load-time constructor initializes
//! the guard from the process environment.

// Allow unsafe FFI functions without safety docs - these are inherently unsafe C ABI
#![allow(clippy::missing_safety_doc)]

#[macro_use]
mod macros;

pub mod control;
mod init;
#[cfg(target_os = "macos")]
pub mod interpose;
pub mod syscalls;
