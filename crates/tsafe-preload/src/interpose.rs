//! macOS `__DATA,__interpose` table entry layout.

#[repr(C)]
pub struct Interpose {
    pub new_func: *const (),
    pub old_func: *const (),
}

// Entries are written once by the linker and only read by dyld.
unsafe impl Sync for Interpose {}
