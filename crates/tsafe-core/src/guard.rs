//! The guard service: gate, snapshot and real-symbol table in one place.
//!
//! Every wrapper goes through `Guard::global()`. Tests build their own
//! instances with an injected `SymbolSource`.

use crate::catalog::{available, real_table, Policy, Symbol};
use crate::error::{GuardError, Result};
use crate::gate::{Gate, GateStatus};
use crate::report::{fatal, Fatal};
use crate::resolver::{PlatformSource, RealSymbol, SymbolSource};
use crate::snapshot::EnvSnapshot;
use libc::{c_char, c_void};
use std::ffi::CStr;
use std::ptr::{self, NonNull};
use std::sync::OnceLock;
use tsafe_config::{log_guard_debug, log_guard_info};

/// What a wrapper should do for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Call the real implementation.
    Real,
    /// Report and abort.
    Refuse,
    /// Answer from the environment snapshot.
    Snapshot,
    /// Return the empty result.
    Empty,
}

pub struct Guard<S: SymbolSource = PlatformSource> {
    gate: Gate,
    snapshot: OnceLock<EnvSnapshot>,
    reals: [RealSymbol; Symbol::COUNT],
    source: S,
}

static GLOBAL: Guard = Guard::new(PlatformSource::new());

impl Guard {
    /// The process-wide instance.
    pub fn global() -> &'static Guard {
        &GLOBAL
    }
}

impl<S: SymbolSource> Guard<S> {
    pub const fn new(source: S) -> Self {
        Self {
            gate: Gate::new(),
            snapshot: OnceLock::new(),
            reals: real_table(),
            source,
        }
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn snapshot(&self) -> Option<&EnvSnapshot> {
        self.snapshot.get()
    }

    /// Take ownership of the snapshot and mark the gate initialized
    /// (disabled). Only the first call succeeds.
    pub fn install(&self, snapshot: EnvSnapshot) -> Result<()> {
        let entries = snapshot.len();
        self.snapshot
            .set(snapshot)
            .map_err(|_| GuardError::AlreadyInitialized)?;
        self.prime_forwarders();
        self.gate.mark_initialized();
        log_guard_info!("Guard initialized", env_entries = entries);
        Ok(())
    }

    /// Resolve always-forwarded symbols up front. Resolving `dlerror` lazily
    /// would run `dlsym` first and wipe the error the caller is asking for.
    /// Safe to call before `install` and any number of times.
    pub fn prime_forwarders(&self) {
        for d in available().filter(|d| d.policy == Policy::ForwardAlways) {
            let _ = self.real(d.symbol);
        }
    }

    pub fn enable(&self) {
        if self.gate.enable() {
            log_guard_debug!("Checking enabled", trigger = "explicit");
        }
    }

    pub fn disable(&self) {
        if self.gate.disable() {
            log_guard_debug!("Checking disabled", trigger = "explicit");
        }
    }

    pub fn is_checking(&self) -> bool {
        self.gate.is_checking()
    }

    pub fn status(&self) -> GateStatus {
        self.gate.status()
    }

    /// The dispatch decision for one call of `symbol`.
    pub fn route(&self, symbol: Symbol) -> Route {
        match symbol.policy() {
            Policy::ForwardAlways => Route::Real,
            Policy::Stubbed => Route::Empty,
            Policy::ThreadSpawnTrigger => {
                if self.gate.on_thread_spawn() {
                    log_guard_debug!("Checking enabled", trigger = symbol.name());
                }
                Route::Real
            }
            Policy::AbortWhenEnabled => {
                if self.gate.is_checking() {
                    Route::Refuse
                } else {
                    Route::Real
                }
            }
            Policy::SnapshotServed => {
                if self.gate.is_checking() {
                    Route::Snapshot
                } else {
                    Route::Real
                }
            }
        }
    }

    /// Cached real implementation of `symbol`.
    pub fn real(&self, symbol: Symbol) -> Option<NonNull<c_void>> {
        self.reals[symbol as usize].get(&self.source)
    }

    pub fn is_resolved(&self, symbol: Symbol) -> bool {
        self.reals[symbol as usize].is_resolved()
    }

    /// Like `real`, but a missing implementation terminates the process.
    pub fn require_real(&self, symbol: Symbol) -> NonNull<c_void> {
        match self.real(symbol) {
            Some(f) => f,
            None => fatal(symbol, Fatal::Unresolved),
        }
    }

    /// Shared wrapper body: route the call, then either hand the real
    /// implementation to `forward` or abort.
    pub fn dispatch<R, F>(&self, symbol: Symbol, forward: F) -> R
    where
        F: FnOnce(NonNull<c_void>) -> R,
    {
        match self.route(symbol) {
            Route::Real => forward(self.require_real(symbol)),
            Route::Refuse => self.refuse(symbol),
            Route::Snapshot | Route::Empty => fatal(symbol, Fatal::NoFallback),
        }
    }

    /// `getenv` answered from the snapshot.
    pub fn env_lookup(&self, name: &CStr) -> Option<&CStr> {
        self.snapshot.get()?.lookup(name.to_bytes())
    }

    /// `getenv` result while checking is active: a pointer into the
    /// snapshot, or null for a null or unknown name.
    pub unsafe fn snapshot_getenv(&self, name: *const c_char) -> *mut c_char {
        if name.is_null() {
            return ptr::null_mut();
        }
        self.env_lookup(CStr::from_ptr(name))
            .map_or(ptr::null_mut(), |value| value.as_ptr() as *mut c_char)
    }

    pub fn refuse(&self, symbol: Symbol) -> ! {
        fatal(symbol, Fatal::ThreadUnsafeCall)
    }
}
