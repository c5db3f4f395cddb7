use libc::{c_char, time_t, tm};

guarded! {
    fn asctime(timeptr: *const tm) -> *mut c_char => Asctime;
    fn ctime(timep: *const time_t) -> *mut c_char => Ctime;
    fn gmtime(timep: *const time_t) -> *mut tm => Gmtime;
    fn localtime(timep: *const time_t) -> *mut tm => Localtime;
    #[cfg(target_os = "linux")]
    fn getdate(string: *const c_char) -> *mut tm => Getdate;
}
