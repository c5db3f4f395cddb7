/// Define wrappers whose behaviour is fully decided by `Guard::dispatch`:
/// forward to the cached real implementation, or abort while checking is
/// active (`AbortWhenEnabled`), flip the gate (`ThreadSpawnTrigger`), or
/// always forward (`ForwardAlways`).
///
/// # Usage:
/// ```ignore
/// guarded! {
///     fn strtok(s: *mut c_char, delim: *const c_char) -> *mut c_char => Strtok;
/// }
/// ```
#[macro_export]
macro_rules! guarded {
    ($(
        $(#[$meta:meta])*
        fn $name:ident($($arg:ident: $ty:ty),* $(,)?) $(-> $ret:ty)? => $sym:ident;
    )*) => {
        $(
            $(#[$meta])*
            #[cfg_attr(not(target_os = "macos"), no_mangle)]
            pub unsafe extern "C" fn $name($($arg: $ty),*) $(-> $ret)? {
                tsafe_core::Guard::global().dispatch(tsafe_core::Symbol::$sym, |f| {
                    let real = std::mem::transmute::<
                        *mut libc::c_void,
                        unsafe extern "C" fn($($ty),*) $(-> $ret)?,
                    >(f.as_ptr());
                    real($($arg),*)
                })
            }

            $crate::interpose_entry! {
                $(#[$meta])*
                $name($($ty),*) $(-> $ret)?
            }
        )*
    };
}

/// macOS: register `$name` in the `__DATA,__interpose` table so dyld swaps
/// it in for the libSystem definition.
#[cfg(target_os = "macos")]
#[macro_export]
macro_rules! interpose_entry {
    ($(#[$meta:meta])* $name:ident($($ty:ty),*) $(-> $ret:ty)?) => {
        $(#[$meta])*
        pub mod $name {
            #[allow(unused_imports)]
            use super::*;

            extern "C" {
                pub fn $name($(_: $ty),*) $(-> $ret)?;
            }

            #[link_section = "__DATA,__interpose"]
            #[used]
            pub static IT: $crate::interpose::Interpose = $crate::interpose::Interpose {
                new_func: super::$name as *const (),
                old_func: $name as *const (),
            };
        }
    };
}

/// ELF loaders resolve exported symbols by name; no table needed.
#[cfg(not(target_os = "macos"))]
#[macro_export]
macro_rules! interpose_entry {
    ($($tt:tt)*) => {};
}
