//! Immutable copy of the process environment.
//!
//! Taken once at initialization and used to answer `getenv` while checking
//! is active, so lookups never touch the live (mutable, unlocked) environ.

use libc::c_char;
use std::ffi::{CStr, CString};

/// Entries are never mutated after construction, so pointers handed out by
/// `lookup` stay valid for as long as the snapshot lives.
pub struct EnvSnapshot {
    entries: Vec<CString>,
}

impl EnvSnapshot {
    /// Duplicate every entry of a null-terminated `NAME=VALUE` vector.
    ///
    /// # Safety
    /// `envp` must be non-null and point to a null-terminated array of valid
    /// C strings.
    pub unsafe fn from_environ(envp: *const *const c_char) -> Self {
        let mut entries = Vec::new();
        let mut cursor = envp;
        while !(*cursor).is_null() {
            entries.push(CStr::from_ptr(*cursor).to_owned());
            cursor = cursor.add(1);
        }
        Self { entries }
    }

    /// Build from owned entries. Bytes after an embedded NUL are dropped, the
    /// same way a C consumer would see the string.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        let entries = entries
            .into_iter()
            .map(|entry| {
                let bytes: Vec<u8> = entry.into().into_iter().take_while(|&b| b != 0).collect();
                CString::new(bytes).unwrap_or_default()
            })
            .collect();
        Self { entries }
    }

    /// Value of the first entry named exactly `name`.
    pub fn lookup(&self, name: &[u8]) -> Option<&CStr> {
        self.entries.iter().find_map(|entry| {
            let bytes = entry.as_bytes_with_nul();
            let eq = bytes.iter().position(|&b| b == b'=')?;
            if &bytes[..eq] != name {
                return None;
            }
            CStr::from_bytes_with_nul(&bytes[eq + 1..]).ok()
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSnapshot")
            .field("entries", &self.entries.len())
            .finish()
    }
}
