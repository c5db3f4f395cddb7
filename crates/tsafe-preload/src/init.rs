//! Load-time constructor.

use libc::c_char;
use tsafe_config::{init_logging, log_preload_debug, log_preload_info, log_preload_warn};

fn on_load() {
    // Before anything can call dlsym on our behalf.
    tsafe_core::prime();

    let load_error = tsafe_config::reload().err();
    let config = tsafe_config::config().clone();
    init_logging(config.logging.level);
    if let Some(e) = load_error {
        log_preload_warn!("Config unusable, using defaults", error = tracing::field::display(&e));
    }

    log_preload_debug!(
        "Wrappers loaded",
        exported = tsafe_core::catalog::available().count()
    );

    if !config.guard.auto_init {
        log_preload_debug!("Auto-init disabled, waiting for tsafe_init");
        return;
    }

    match unsafe { tsafe_core::init(process_environ()) } {
        Ok(()) => log_preload_info!("Guard armed", pid = std::process::id()),
        Err(e) => log_preload_warn!("Auto-init failed", error = tracing::field::display(&e)),
    }
}

#[cfg(target_vendor = "apple")]
fn process_environ() -> *const *const c_char {
    unsafe { *libc::_NSGetEnviron() as *const *const c_char }
}

#[cfg(not(target_vendor = "apple"))]
fn process_environ() -> *const *const c_char {
    extern "C" {
        static environ: *const *const c_char;
    }
    unsafe { environ }
}

extern "C" fn constructor() {
    on_load()
}

#[used]
#[cfg_attr(not(target_vendor = "apple"), link_section = ".init_array")]
#[cfg_attr(target_vendor = "apple", link_section = "__DATA,__mod_init_func")]
static INIT: extern "C" fn() = constructor;
