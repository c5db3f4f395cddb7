//! Network database lookups. `struct netent` is passed through opaquely.

use libc::{c_char, c_int, c_void, hostent, in_addr, protoent, servent};

guarded! {
    fn gethostent() -> *mut hostent => Gethostent;
    fn getnetbyaddr(net: u32, kind: c_int) -> *mut c_void => Getnetbyaddr;
    fn getnetbyname(name: *const c_char) -> *mut c_void => Getnetbyname;
    fn getnetent() -> *mut c_void => Getnetent;
    fn getprotobyname(name: *const c_char) -> *mut protoent => Getprotobyname;
    fn getprotobynumber(proto: c_int) -> *mut protoent => Getprotobynumber;
    fn getprotoent() -> *mut protoent => Getprotoent;
    fn getservent() -> *mut servent => Getservent;
    fn getservbyname(name: *const c_char, proto: *const c_char) -> *mut servent => Getservbyname;
    fn getservbyport(port: c_int, proto: *const c_char) -> *mut servent => Getservbyport;
    fn inet_ntoa(addr: in_addr) -> *mut c_char => InetNtoa;
}
