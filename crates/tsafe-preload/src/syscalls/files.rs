use libc::{c_char, c_int, dirent, DIR};

guarded! {
    fn basename(path: *mut c_char) -> *mut c_char => Basename;
    fn dirname(path: *mut c_char) -> *mut c_char => Dirname;
    fn ctermid(s: *mut c_char) -> *mut c_char => Ctermid;
    fn tmpnam(s: *mut c_char) -> *mut c_char => Tmpnam;
    fn ttyname(fd: c_int) -> *mut c_char => Ttyname;
    fn system(command: *const c_char) -> c_int => System;
    fn readdir(dirp: *mut DIR) -> *mut dirent => Readdir;
}
