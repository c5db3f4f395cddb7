//! User, group and login accounting databases.

#[cfg(not(target_os = "openbsd"))]
use libc::c_void;
use libc::{c_char, gid_t, group, passwd, uid_t};

#[cfg(any(
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
))]
guarded! {
    fn setgrent() -> libc::c_int => Setgrent;
}

#[cfg(not(any(
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
guarded! {
    fn setgrent() => Setgrent;
}

guarded! {
    fn getgrent() -> *mut group => Getgrent;
    fn getgrgid(gid: gid_t) -> *mut group => Getgrgid;
    fn getgrnam(name: *const c_char) -> *mut group => Getgrnam;
    fn endgrent() => Endgrent;
    fn getpwent() -> *mut passwd => Getpwent;
    fn getpwnam(name: *const c_char) -> *mut passwd => Getpwnam;
    fn getpwuid(uid: uid_t) -> *mut passwd => Getpwuid;
    fn setpwent() => Setpwent;
    fn endpwent() => Endpwent;
    fn getlogin() -> *mut c_char => Getlogin;
}

// `struct utmpx` is passed through opaquely.
#[cfg(not(target_os = "openbsd"))]
guarded! {
    fn getutxent() -> *mut c_void => Getutxent;
    fn getutxid(id: *const c_void) -> *mut c_void => Getutxid;
    fn getutxline(line: *const c_void) -> *mut c_void => Getutxline;
    fn setutxent() => Setutxent;
    fn pututxline(ut: *const c_void) -> *mut c_void => Pututxline;
}
