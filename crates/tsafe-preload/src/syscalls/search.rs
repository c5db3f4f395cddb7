//! The process-global hash table of `<search.h>`.

use libc::{c_char, c_int, c_void, size_t};

/// `ENTRY` from `<search.h>`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub key: *mut c_char,
    pub data: *mut c_void,
}

/// `ACTION` from `<search.h>` (`FIND` = 0, `ENTER` = 1).
pub type Action = c_int;

guarded! {
    fn hcreate(nel: size_t) -> c_int => Hcreate;
    fn hsearch(item: Entry, action: Action) -> *mut Entry => Hsearch;
    fn hdestroy() => Hdestroy;
}
