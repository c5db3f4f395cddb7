//! DES helpers from `<crypt.h>` / `<unistd.h>`. Both arguments of `crypt`
//! are forwarded unchanged.

use libc::{c_char, c_int};

guarded! {
    fn crypt(key: *const c_char, salt: *const c_char) -> *mut c_char => Crypt;
}

#[cfg(any(
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
))]
guarded! {
    fn encrypt(block: *mut c_char, edflag: c_int) -> c_int => Encrypt;
    fn setkey(key: *const c_char) -> c_int => Setkey;
}

#[cfg(not(any(
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
guarded! {
    fn encrypt(block: *mut c_char, edflag: c_int) => Encrypt;
    fn setkey(key: *const c_char) => Setkey;
}
