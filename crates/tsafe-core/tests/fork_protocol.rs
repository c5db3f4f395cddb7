//! Fork protocol against the global guard. One test per file: this binary
//! owns the process-wide gate.

use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, ForkResult};
use tsafe_core::{EnvSnapshot, GateStatus, Guard, GuardError, Route, Symbol};

const CHILD_DISABLED: i32 = 10;
const CHILD_ENABLED: i32 = 11;
const CHILD_UNINITIALIZED: i32 = 12;
const CHILD_RETRIGGERED: i32 = 20;

fn child_status_code() -> i32 {
    match Guard::global().status() {
        GateStatus::Disabled => CHILD_DISABLED,
        GateStatus::Enabled => CHILD_ENABLED,
        GateStatus::Uninitialized => CHILD_UNINITIALIZED,
    }
}

fn fork_and_wait(body: fn() -> i32) -> WaitStatus {
    match unsafe { fork() }.expect("fork") {
        ForkResult::Child => {
            let code = body();
            unsafe { libc::_exit(code) }
        }
        ForkResult::Parent { child } => waitpid(child, None).expect("waitpid"),
    }
}

#[test]
fn fork_resets_child_and_preserves_parent() {
    assert_eq!(
        unsafe { tsafe_core::init(std::ptr::null()) },
        Err(GuardError::NullEnvironment)
    );

    tsafe_core::init_from_snapshot(EnvSnapshot::from_entries(["PATH=/bin"])).unwrap();
    assert_eq!(
        tsafe_core::init_from_snapshot(EnvSnapshot::from_entries(["PATH=/usr/bin"])),
        Err(GuardError::AlreadyInitialized)
    );
    assert_eq!(Guard::global().status(), GateStatus::Disabled);

    // Disabled parent: the child stays disabled.
    let status = fork_and_wait(child_status_code);
    assert!(matches!(status, WaitStatus::Exited(_, CHILD_DISABLED)), "got {status:?}");

    // First spawn in the parent turns checking on.
    assert_eq!(Guard::global().route(Symbol::PthreadCreate), Route::Real);
    assert!(tsafe_core::is_checking());

    // Enabled parent: the child starts disabled, the parent is unchanged.
    let status = fork_and_wait(child_status_code);
    assert!(matches!(status, WaitStatus::Exited(_, CHILD_DISABLED)), "got {status:?}");
    assert_eq!(Guard::global().status(), GateStatus::Enabled);

    // The child re-arms on its own first spawn.
    let status = fork_and_wait(|| {
        let _ = Guard::global().route(Symbol::PthreadCreate);
        if Guard::global().is_checking() {
            CHILD_RETRIGGERED
        } else {
            0
        }
    });
    assert!(matches!(status, WaitStatus::Exited(_, CHILD_RETRIGGERED)), "got {status:?}");

    // The lock is free again on the parent side.
    tsafe_core::disable();
    assert_eq!(Guard::global().status(), GateStatus::Disabled);
    tsafe_core::enable();
    assert_eq!(Guard::global().env_lookup(c"PATH").unwrap(), c"/bin");
    assert_eq!(Guard::global().route(Symbol::Getenv), Route::Snapshot);
}
