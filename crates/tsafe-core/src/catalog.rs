//! The catalogue of intercepted libc entry points.
//!
//! Each row names a symbol, its dispatch policy, the C prototype the wrapper
//! must reproduce, and whether this build exports it. The wrappers
//! themselves live in `tsafe-preload`; this table is what they dispatch on.

use crate::resolver::RealSymbol;

/// How a wrapper behaves with respect to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Always call the real implementation.
    ForwardAlways,
    /// Switch checking on, then call the real implementation.
    ThreadSpawnTrigger,
    /// Call the real implementation unless checking is active, then abort.
    AbortWhenEnabled,
    /// Call the real implementation unless checking is active, then answer
    /// from the environment snapshot.
    SnapshotServed,
    /// No implementation is wired; the result is always empty.
    Stubbed,
}

#[derive(Debug)]
pub struct Descriptor {
    pub symbol: Symbol,
    pub name: &'static str,
    pub policy: Policy,
    /// Whether this build exports a wrapper for the symbol.
    pub available: bool,
    pub prototype: &'static str,
}

macro_rules! catalog {
    ($( $variant:ident => $name:literal, $policy:ident, $avail:expr, $proto:literal; )*) => {
        /// Index into the catalogue.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(usize)]
        pub enum Symbol {
            $( $variant, )*
        }

        impl Symbol {
            pub const ALL: &'static [Symbol] = &[$( Symbol::$variant, )*];
            pub const COUNT: usize = Symbol::ALL.len();
        }

        pub static CATALOG: [Descriptor; Symbol::COUNT] = [
            $(
                Descriptor {
                    symbol: Symbol::$variant,
                    name: $name,
                    policy: Policy::$policy,
                    available: $avail,
                    prototype: $proto,
                },
            )*
        ];

        /// One unresolved slot per catalogue row, in `Symbol` order.
        pub(crate) const fn real_table() -> [RealSymbol; Symbol::COUNT] {
            [$( RealSymbol::new(concat!($name, "\0")), )*]
        }
    };
}

catalog! {
    // environment
    Getenv => "getenv", SnapshotServed, true, "char *getenv(const char *name)";
    Setenv => "setenv", AbortWhenEnabled, true, "int setenv(const char *name, const char *value, int overwrite)";
    Unsetenv => "unsetenv", AbortWhenEnabled, true, "int unsetenv(const char *name)";
    Putenv => "putenv", AbortWhenEnabled, true, "int putenv(char *string)";

    // time
    Asctime => "asctime", AbortWhenEnabled, true, "char *asctime(const struct tm *tm)";
    Ctime => "ctime", AbortWhenEnabled, true, "char *ctime(const time_t *timep)";
    Gmtime => "gmtime", AbortWhenEnabled, true, "struct tm *gmtime(const time_t *timep)";
    Localtime => "localtime", AbortWhenEnabled, true, "struct tm *localtime(const time_t *timep)";
    Getdate => "getdate", AbortWhenEnabled, cfg!(target_os = "linux"), "struct tm *getdate(const char *string)";

    // locale and text
    Catgets => "catgets", Stubbed, true, "char *catgets(nl_catd catalog, int set_number, int message_number, const char *message)";
    Localeconv => "localeconv", AbortWhenEnabled, true, "struct lconv *localeconv(void)";
    Strerror => "strerror", AbortWhenEnabled, true, "char *strerror(int errnum)";
    Strsignal => "strsignal", AbortWhenEnabled, true, "char *strsignal(int sig)";
    Strtok => "strtok", AbortWhenEnabled, true, "char *strtok(char *str, const char *delim)";
    L64a => "l64a", AbortWhenEnabled, true, "char *l64a(long value)";

    // paths, terminals, processes
    Basename => "basename", AbortWhenEnabled, true, "char *basename(char *path)";
    Dirname => "dirname", AbortWhenEnabled, true, "char *dirname(char *path)";
    Ctermid => "ctermid", AbortWhenEnabled, true, "char *ctermid(char *s)";
    Tmpnam => "tmpnam", AbortWhenEnabled, true, "char *tmpnam(char *s)";
    Ttyname => "ttyname", AbortWhenEnabled, true, "char *ttyname(int fd)";
    System => "system", AbortWhenEnabled, true, "int system(const char *command)";
    Readdir => "readdir", AbortWhenEnabled, true, "struct dirent *readdir(DIR *dirp)";

    // users, groups, sessions
    Getgrent => "getgrent", AbortWhenEnabled, true, "struct group *getgrent(void)";
    Getgrgid => "getgrgid", AbortWhenEnabled, true, "struct group *getgrgid(gid_t gid)";
    Getgrnam => "getgrnam", AbortWhenEnabled, true, "struct group *getgrnam(const char *name)";
    Setgrent => "setgrent", AbortWhenEnabled, true, "void setgrent(void)";
    Endgrent => "endgrent", AbortWhenEnabled, true, "void endgrent(void)";
    Getpwent => "getpwent", AbortWhenEnabled, true, "struct passwd *getpwent(void)";
    Getpwnam => "getpwnam", AbortWhenEnabled, true, "struct passwd *getpwnam(const char *name)";
    Getpwuid => "getpwuid", AbortWhenEnabled, true, "struct passwd *getpwuid(uid_t uid)";
    Setpwent => "setpwent", AbortWhenEnabled, true, "void setpwent(void)";
    Endpwent => "endpwent", AbortWhenEnabled, true, "void endpwent(void)";
    Getlogin => "getlogin", AbortWhenEnabled, true, "char *getlogin(void)";
    Getutxent => "getutxent", AbortWhenEnabled, cfg!(not(target_os = "openbsd")), "struct utmpx *getutxent(void)";
    Getutxid => "getutxid", AbortWhenEnabled, cfg!(not(target_os = "openbsd")), "struct utmpx *getutxid(const struct utmpx *id)";
    Getutxline => "getutxline", AbortWhenEnabled, cfg!(not(target_os = "openbsd")), "struct utmpx *getutxline(const struct utmpx *line)";
    Setutxent => "setutxent", AbortWhenEnabled, cfg!(not(target_os = "openbsd")), "void setutxent(void)";
    Pututxline => "pututxline", AbortWhenEnabled, cfg!(not(target_os = "openbsd")), "struct utmpx *pututxline(const struct utmpx *ut)";

    // network database
    Gethostent => "gethostent", AbortWhenEnabled, true, "struct hostent *gethostent(void)";
    Getnetbyaddr => "getnetbyaddr", AbortWhenEnabled, true, "struct netent *getnetbyaddr(uint32_t net, int type)";
    Getnetbyname => "getnetbyname", AbortWhenEnabled, true, "struct netent *getnetbyname(const char *name)";
    Getnetent => "getnetent", AbortWhenEnabled, true, "struct netent *getnetent(void)";
    Getprotobyname => "getprotobyname", AbortWhenEnabled, true, "struct protoent *getprotobyname(const char *name)";
    Getprotobynumber => "getprotobynumber", AbortWhenEnabled, true, "struct protoent *getprotobynumber(int proto)";
    Getprotoent => "getprotoent", AbortWhenEnabled, true, "struct protoent *getprotoent(void)";
    Getservent => "getservent", AbortWhenEnabled, true, "struct servent *getservent(void)";
    Getservbyname => "getservbyname", AbortWhenEnabled, true, "struct servent *getservbyname(const char *name, const char *proto)";
    Getservbyport => "getservbyport", AbortWhenEnabled, true, "struct servent *getservbyport(int port, const char *proto)";
    InetNtoa => "inet_ntoa", AbortWhenEnabled, true, "char *inet_ntoa(struct in_addr in)";

    // random numbers and math
    Rand => "rand", AbortWhenEnabled, true, "int rand(void)";
    Drand48 => "drand48", AbortWhenEnabled, true, "double drand48(void)";
    Lrand48 => "lrand48", AbortWhenEnabled, true, "long lrand48(void)";
    Mrand48 => "mrand48", AbortWhenEnabled, true, "long mrand48(void)";
    Lgamma => "lgamma", AbortWhenEnabled, true, "double lgamma(double x)";
    Lgammaf => "lgammaf", AbortWhenEnabled, true, "float lgammaf(float x)";

    // hash tables
    Hcreate => "hcreate", AbortWhenEnabled, true, "int hcreate(size_t nel)";
    Hsearch => "hsearch", AbortWhenEnabled, true, "ENTRY *hsearch(ENTRY item, ACTION action)";
    Hdestroy => "hdestroy", AbortWhenEnabled, true, "void hdestroy(void)";

    // crypt
    Crypt => "crypt", AbortWhenEnabled, cfg!(feature = "crypt"), "char *crypt(const char *key, const char *salt)";
    Encrypt => "encrypt", AbortWhenEnabled, cfg!(feature = "crypt"), "void encrypt(char block[64], int edflag)";
    Setkey => "setkey", AbortWhenEnabled, cfg!(feature = "crypt"), "void setkey(const char *key)";

    // threads and the loader
    PthreadCreate => "pthread_create", ThreadSpawnTrigger,
        cfg!(any(target_os = "linux", target_os = "android", target_vendor = "apple")),
        "int pthread_create(pthread_t *thread, const pthread_attr_t *attr, void *(*start)(void *), void *arg)";
    Dlerror => "dlerror", ForwardAlways, true, "char *dlerror(void)";
}

impl Symbol {
    pub fn descriptor(self) -> &'static Descriptor {
        &CATALOG[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn policy(self) -> Policy {
        self.descriptor().policy
    }

    pub fn prototype(self) -> &'static str {
        self.descriptor().prototype
    }

    pub fn is_available(self) -> bool {
        self.descriptor().available
    }
}

/// Rows exported by this build.
pub fn available() -> impl Iterator<Item = &'static Descriptor> {
    CATALOG.iter().filter(|d| d.available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rows_line_up_with_symbols() {
        for (i, d) in CATALOG.iter().enumerate() {
            assert_eq!(d.symbol as usize, i, "{} out of order", d.name);
            assert_eq!(Symbol::ALL[i], d.symbol);
        }
        assert_eq!(CATALOG.len(), Symbol::COUNT);
    }

    #[test]
    fn names_are_unique_and_plain() {
        let mut seen = HashSet::new();
        for d in CATALOG.iter() {
            assert!(seen.insert(d.name), "duplicate row {}", d.name);
            assert!(!d.name.is_empty());
            assert!(!d.name.contains('\0'));
            assert!(d.prototype.contains(d.name), "{} prototype mismatch", d.name);
        }
    }

    #[test]
    fn single_trigger_and_single_snapshot_row() {
        let by_policy = |p: Policy| CATALOG.iter().filter(|d| d.policy == p).count();
        assert_eq!(by_policy(Policy::ThreadSpawnTrigger), 1);
        assert_eq!(by_policy(Policy::SnapshotServed), 1);
        assert_eq!(Symbol::Getenv.policy(), Policy::SnapshotServed);
        assert_eq!(Symbol::PthreadCreate.policy(), Policy::ThreadSpawnTrigger);
        assert_eq!(Symbol::Catgets.policy(), Policy::Stubbed);
    }

    #[test]
    fn environment_mutators_abort() {
        for sym in [Symbol::Setenv, Symbol::Unsetenv, Symbol::Putenv] {
            assert_eq!(sym.policy(), Policy::AbortWhenEnabled);
        }
    }

    #[test]
    fn platform_rows() {
        assert!(Symbol::Getenv.is_available());
        assert_eq!(Symbol::Getdate.is_available(), cfg!(target_os = "linux"));
        assert_eq!(Symbol::Crypt.is_available(), cfg!(feature = "crypt"));
        assert!(available().all(|d| d.available));
    }

    #[test]
    fn real_table_names_follow_catalog() {
        let table = real_table();
        for (slot, d) in table.iter().zip(CATALOG.iter()) {
            assert_eq!(slot.name(), d.name);
            assert!(!slot.is_resolved());
        }
    }
}
