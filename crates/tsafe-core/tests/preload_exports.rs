//! Drives the built preload library through its exported C symbols.
//!
//! The library is opened with `RTLD_LOCAL`, so its wrappers only see the
//! calls made here. Skipped when the cdylib is not next to the test binary.
#![cfg(target_os = "linux")]

use libc::{c_char, c_int, c_void};
use std::ffi::{CStr, CString};
use std::os::unix::ffi::OsStringExt;
use std::path::PathBuf;
use std::ptr;
use tsafe_core::catalog;

type InitFn = unsafe extern "C" fn(*const *const c_char) -> c_int;
type ToggleFn = extern "C" fn();
type IsOnFn = extern "C" fn() -> c_int;
type GetenvFn = unsafe extern "C" fn(*const c_char) -> *mut c_char;
type CatgetsFn = unsafe extern "C" fn(*mut c_void, c_int, c_int, *const c_char) -> *mut c_char;
type DlerrorFn = unsafe extern "C" fn() -> *mut c_char;

fn library_path() -> Option<PathBuf> {
    // target/<profile>/deps/<test binary> -> target/<profile>
    let exe = std::env::current_exe().ok()?;
    let path = exe.parent()?.parent()?.join("libtsafe_preload.so");
    path.exists().then_some(path)
}

struct Library(*mut c_void);

impl Library {
    fn open() -> Option<Self> {
        let path = CString::new(library_path()?.into_os_string().into_vec()).ok()?;
        let handle = unsafe { libc::dlopen(path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
        (!handle.is_null()).then_some(Self(handle))
    }

    /// Base address of the object that defines `name` when looked up from
    /// this library (itself first, then its dependencies).
    fn definer(&self, name: &CStr) -> *mut c_void {
        unsafe {
            let addr = libc::dlsym(self.0, name.as_ptr());
            if addr.is_null() {
                return ptr::null_mut();
            }
            let mut info: libc::Dl_info = std::mem::zeroed();
            if libc::dladdr(addr, &mut info) == 0 {
                return ptr::null_mut();
            }
            info.dli_fbase
        }
    }

    unsafe fn sym<T: Copy>(&self, name: &CStr) -> T {
        let f = libc::dlsym(self.0, name.as_ptr());
        assert!(!f.is_null(), "{name:?} not exported");
        std::mem::transmute_copy(&f)
    }
}

#[test]
fn control_abi_and_snapshot_getenv() {
    std::env::set_var("TSAFE_EXPORT_CHECK", "snap");
    std::env::set_var("TSAFE_AUTO_INIT", "0");
    let Some(lib) = Library::open() else {
        eprintln!("libtsafe_preload.so not built, skipping");
        return;
    };

    unsafe {
        let init: InitFn = lib.sym(c"tsafe_init");
        let on: ToggleFn = lib.sym(c"tsafe_on");
        let off: ToggleFn = lib.sym(c"tsafe_off");
        let is_on: IsOnFn = lib.sym(c"tsafe_is_on");
        let getenv: GetenvFn = lib.sym(c"getenv");
        let catgets: CatgetsFn = lib.sym(c"catgets");

        // Without init, the first dlerror through the wrapper still reports
        // the pending loader error.
        let dlerror: DlerrorFn = lib.sym(c"dlerror");
        assert!(libc::dlopen(c"/nonexistent/libtsafe_missing.so".as_ptr(), libc::RTLD_NOW).is_null());
        let message = dlerror();
        assert!(!message.is_null(), "pending dlerror was cleared");
        assert!(CStr::from_ptr(message).to_string_lossy().contains("libtsafe_missing"));

        assert_eq!(init(ptr::null()), libc::EINVAL);

        // Auto-init is off unless a broken config file forced defaults; the
        // real environment carries the same value either way.
        let entry = c"TSAFE_EXPORT_CHECK=snap";
        let envp = [entry.as_ptr(), ptr::null()];
        let first = init(envp.as_ptr());
        assert!(first == 0 || first == libc::EALREADY, "tsafe_init returned {first}");
        assert_eq!(init(envp.as_ptr()), libc::EALREADY);

        assert_eq!(is_on(), 0);
        on();
        on();
        assert_eq!(is_on(), 1);

        let served = getenv(c"TSAFE_EXPORT_CHECK".as_ptr());
        assert!(!served.is_null());
        assert_eq!(CStr::from_ptr(served), c"snap");
        assert_eq!(getenv(c"TSAFE_EXPORT_CHECK".as_ptr()), served);
        assert!(getenv(ptr::null()).is_null());

        std::env::set_var("TSAFE_EXPORT_CHECK", "live");
        assert_eq!(CStr::from_ptr(getenv(c"TSAFE_EXPORT_CHECK".as_ptr())), c"snap");

        assert!(catgets(ptr::null_mut(), 1, 1, c"default".as_ptr()).is_null());

        off();
        assert_eq!(is_on(), 0);
        assert_eq!(CStr::from_ptr(getenv(c"TSAFE_EXPORT_CHECK".as_ptr())), c"live");
        assert!(catgets(ptr::null_mut(), 1, 1, c"default".as_ptr()).is_null());
    }

    let own = lib.definer(c"tsafe_init");
    assert!(!own.is_null());
    for d in catalog::available() {
        let name = CString::new(d.name).unwrap();
        assert_eq!(lib.definer(&name), own, "{} has no exported wrapper", d.name);
    }
}
