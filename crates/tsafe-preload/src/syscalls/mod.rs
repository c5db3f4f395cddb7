//! Exported wrappers, grouped by the libc area they come from.

pub mod env;
pub mod files;
pub mod locale;
pub mod netdb;
pub mod numeric;
pub mod search;
pub mod thread;
pub mod time;
pub mod users;

#[cfg(feature = "crypt")]
pub mod crypt;
