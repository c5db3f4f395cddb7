//! Generators and math functions with hidden global state.

use libc::{c_double, c_float, c_int, c_long};

guarded! {
    fn rand() -> c_int => Rand;
    fn drand48() -> c_double => Drand48;
    fn lrand48() -> c_long => Lrand48;
    fn mrand48() -> c_long => Mrand48;
    fn lgamma(x: c_double) -> c_double => Lgamma;
    fn lgammaf(x: c_float) -> c_float => Lgammaf;
}
