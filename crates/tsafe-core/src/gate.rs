//! Process-wide safety gate.
//!
//! Checking is active only when the gate has been initialized *and* is
//! enabled. Both flags are read and written under the gate lock.

use crate::sync::GateMutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    /// Initialization has not run; every call passes through.
    Uninitialized,
    Disabled,
    Enabled,
}

#[derive(Debug, Default)]
struct GateState {
    initialized: bool,
    enabled: bool,
}

pub struct Gate {
    state: GateMutex<GateState>,
}

impl Gate {
    pub const fn new() -> Self {
        Self {
            state: GateMutex::new(GateState {
                initialized: false,
                enabled: false,
            }),
        }
    }

    /// Turn checking on. Returns true if the flag changed.
    pub fn enable(&self) -> bool {
        self.set_enabled(true)
    }

    /// Turn checking off. Returns true if the flag changed.
    pub fn disable(&self) -> bool {
        self.set_enabled(false)
    }

    fn set_enabled(&self, on: bool) -> bool {
        let mut state = self.state.lock();
        let changed = state.enabled != on;
        state.enabled = on;
        changed
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().initialized
    }

    /// True when thread-unsafe calls must be refused.
    pub fn is_checking(&self) -> bool {
        let state = self.state.lock();
        state.initialized && state.enabled
    }

    pub fn status(&self) -> GateStatus {
        let state = self.state.lock();
        match (state.initialized, state.enabled) {
            (false, _) => GateStatus::Uninitialized,
            (true, false) => GateStatus::Disabled,
            (true, true) => GateStatus::Enabled,
        }
    }

    /// Mark initialization complete. The gate always leaves this disabled.
    pub fn mark_initialized(&self) {
        let mut state = self.state.lock();
        state.initialized = true;
        state.enabled = false;
    }

    /// A new OS thread is about to be created. Returns true if this call
    /// switched checking on.
    pub fn on_thread_spawn(&self) -> bool {
        let mut state = self.state.lock();
        if state.initialized && !state.enabled {
            state.enabled = true;
            return true;
        }
        false
    }

    /// `pthread_atfork` prepare: hold the lock across the fork.
    pub unsafe fn fork_prepare(&self) {
        self.state.lock_raw();
    }

    /// `pthread_atfork` parent: release, state untouched.
    pub unsafe fn fork_parent(&self) {
        self.state.unlock_raw();
    }

    /// `pthread_atfork` child: the child has a single thread, so checking
    /// goes back off until it spawns one.
    pub unsafe fn fork_child(&self) {
        let state = self.state.data_unchecked();
        if state.initialized && state.enabled {
            state.enabled = false;
        }
        self.state.unlock_raw();
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}
