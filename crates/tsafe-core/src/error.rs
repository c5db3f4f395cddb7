use libc::c_int;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("guard is already initialized")]
    AlreadyInitialized,

    #[error("environment vector is null")]
    NullEnvironment,
}

pub type Result<T> = std::result::Result<T, GuardError>;

impl GuardError {
    /// Value returned by `tsafe_init` for this error.
    pub fn errno(&self) -> c_int {
        match self {
            GuardError::AlreadyInitialized => libc::EALREADY,
            GuardError::NullEnvironment => libc::EINVAL,
        }
    }
}
