//! Real Symbol Storage
//!
//! Locates the un-intercepted implementation of a libc function and caches
//! it for the life of the process.
//!
//! On Linux, macOS and Solaris: `dlsym(RTLD_NEXT)` finds the next definition
//! after ours in the lookup order.
//! On the BSDs: the C runtime is opened as a plain shared object and the
//! symbol is looked up in that handle.

use libc::{c_char, c_void};
use std::ffi::CStr;
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

/// Where real implementations come from.
pub trait SymbolSource: Sync {
    /// Address of `name`, or null when it cannot be found.
    fn lookup(&self, name: &CStr) -> *mut c_void;
}

/// `dlsym(RTLD_NEXT, name)`
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_vendor = "apple",
    target_os = "solaris",
    target_os = "illumos"
))]
#[derive(Debug, Default, Clone, Copy)]
pub struct NextObject;

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_vendor = "apple",
    target_os = "solaris",
    target_os = "illumos"
))]
impl NextObject {
    pub const fn new() -> Self {
        NextObject
    }
}

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_vendor = "apple",
    target_os = "solaris",
    target_os = "illumos"
))]
impl SymbolSource for NextObject {
    fn lookup(&self, name: &CStr) -> *mut c_void {
        unsafe { libc::dlsym(libc::RTLD_NEXT, name.as_ptr()) }
    }
}

/// Opens the C runtime once with `dlopen` and resolves from that handle.
pub struct SharedLibc {
    candidates: &'static [&'static CStr],
    handle: AtomicPtr<c_void>,
    opened: AtomicBool,
}

impl SharedLibc {
    pub const DEFAULT_CANDIDATES: &'static [&'static CStr] = &[c"/usr/lib/libc.so", c"libc.so.7"];

    pub const fn new() -> Self {
        Self::with_candidates(Self::DEFAULT_CANDIDATES)
    }

    /// Paths are tried in order; the first one `dlopen` accepts wins.
    pub const fn with_candidates(candidates: &'static [&'static CStr]) -> Self {
        Self {
            candidates,
            handle: AtomicPtr::new(ptr::null_mut()),
            opened: AtomicBool::new(false),
        }
    }

    fn handle(&self) -> *mut c_void {
        if self.opened.load(Ordering::Acquire) {
            return self.handle.load(Ordering::Relaxed);
        }
        let handle = self
            .candidates
            .iter()
            .map(|path| unsafe { libc::dlopen(path.as_ptr(), libc::RTLD_LAZY) })
            .find(|h| !h.is_null())
            .unwrap_or(ptr::null_mut());
        self.handle.store(handle, Ordering::Relaxed);
        self.opened.store(true, Ordering::Release);
        handle
    }
}

impl Default for SharedLibc {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolSource for SharedLibc {
    fn lookup(&self, name: &CStr) -> *mut c_void {
        let handle = self.handle();
        if handle.is_null() {
            return ptr::null_mut();
        }
        unsafe { libc::dlsym(handle, name.as_ptr()) }
    }
}

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_vendor = "apple",
    target_os = "solaris",
    target_os = "illumos"
))]
pub type PlatformSource = NextObject;

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_vendor = "apple",
    target_os = "solaris",
    target_os = "illumos"
)))]
pub type PlatformSource = SharedLibc;

/// One cached real-implementation slot.
///
/// The outcome of the first lookup is kept even when it is null; a missing
/// symbol is never looked up again.
pub struct RealSymbol {
    ptr: AtomicPtr<c_void>,
    resolved: AtomicBool,
    name: &'static str,
}

impl RealSymbol {
    /// `name` must carry its trailing NUL, e.g. `"getenv\0"`.
    pub const fn new(name: &'static str) -> Self {
        let bytes = name.as_bytes();
        assert!(
            !bytes.is_empty() && bytes[bytes.len() - 1] == 0,
            "symbol name must be NUL-terminated"
        );
        Self {
            ptr: AtomicPtr::new(ptr::null_mut()),
            resolved: AtomicBool::new(false),
            name,
        }
    }

    /// Name without the NUL.
    pub fn name(&self) -> &'static str {
        &self.name[..self.name.len() - 1]
    }

    pub fn c_name(&self) -> &'static CStr {
        unsafe { CStr::from_ptr(self.name.as_ptr() as *const c_char) }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::Acquire)
    }

    /// Cached address, resolving through `source` on first use only.
    pub fn get<S: SymbolSource + ?Sized>(&self, source: &S) -> Option<NonNull<c_void>> {
        if self.resolved.load(Ordering::Acquire) {
            return NonNull::new(self.ptr.load(Ordering::Relaxed));
        }
        // Concurrent first calls may both look up; both get the same address.
        let f = source.lookup(self.c_name());
        self.ptr.store(f, Ordering::Relaxed);
        self.resolved.store(true, Ordering::Release);
        NonNull::new(f)
    }
}

impl std::fmt::Debug for RealSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealSymbol")
            .field("name", &self.name())
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// Hands out a fixed fake address for known names and counts lookups.
    pub(crate) struct CountingSource {
        pub(crate) lookups: AtomicUsize,
        known: &'static [&'static str],
    }

    impl CountingSource {
        pub(crate) const fn new(known: &'static [&'static str]) -> Self {
            Self {
                lookups: AtomicUsize::new(0),
                known,
            }
        }

        pub(crate) fn count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    impl SymbolSource for CountingSource {
        fn lookup(&self, name: &CStr) -> *mut c_void {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            match name.to_str() {
                Ok(n) if self.known.contains(&n) => 0x1000 as *mut c_void,
                _ => ptr::null_mut(),
            }
        }
    }

    #[test]
    fn resolves_once_and_caches() {
        let source = CountingSource::new(&["getenv"]);
        let slot = RealSymbol::new("getenv\0");
        assert!(!slot.is_resolved());

        for _ in 0..100 {
            assert_eq!(slot.get(&source).map(NonNull::as_ptr), Some(0x1000 as *mut c_void));
        }
        assert!(slot.is_resolved());
        assert_eq!(source.count(), 1);
    }

    #[test]
    fn missing_symbol_is_cached_not_retried() {
        let source = CountingSource::new(&[]);
        let slot = RealSymbol::new("no_such_symbol\0");
        assert!(slot.get(&source).is_none());
        assert!(slot.get(&source).is_none());
        assert!(slot.is_resolved());
        assert_eq!(source.count(), 1);
    }

    #[test]
    fn name_strips_nul() {
        let slot = RealSymbol::new("strtok\0");
        assert_eq!(slot.name(), "strtok");
        assert_eq!(slot.c_name(), c"strtok");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn next_object_finds_libc_symbol() {
        let slot = RealSymbol::new("getpid\0");
        let f = slot.get(&NextObject::new()).expect("getpid via RTLD_NEXT");
        let getpid: unsafe extern "C" fn() -> libc::pid_t = unsafe { std::mem::transmute(f) };
        assert_eq!(unsafe { getpid() }, std::process::id() as libc::pid_t);
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn shared_libc_opens_first_usable_candidate() {
        static CANDIDATES: &[&CStr] = &[c"/nonexistent/libc.so", c"libc.so.6"];
        let source = SharedLibc::with_candidates(CANDIDATES);
        assert!(!source.lookup(c"getpid").is_null());
        assert!(source.lookup(c"__tsafe_not_a_symbol").is_null());
    }

    #[test]
    fn shared_libc_without_library_resolves_nothing() {
        static CANDIDATES: &[&CStr] = &[c"/nonexistent/libc.so"];
        let source = SharedLibc::with_candidates(CANDIDATES);
        assert!(source.lookup(c"getpid").is_null());
    }
}
