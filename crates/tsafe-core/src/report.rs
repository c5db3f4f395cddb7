//! Fatal diagnostics.
//!
//! The message is formatted into a stack buffer and written straight to
//! fd 2, so it appears even when no tracing subscriber is installed and
//! nothing on the path allocates.

use crate::catalog::Symbol;
use std::fmt::Write;
use tsafe_config::log_guard_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fatal {
    /// A thread-unsafe call was made while checking is active.
    ThreadUnsafeCall,
    /// The real implementation could not be located.
    Unresolved,
    /// A wrapper was routed to a fallback it does not have.
    NoFallback,
}

impl Fatal {
    pub fn describe(self) -> &'static str {
        match self {
            Fatal::ThreadUnsafeCall => "thread-unsafe call while checking is enabled",
            Fatal::Unresolved => "real implementation not found",
            Fatal::NoFallback => "no fallback wired for this entry point",
        }
    }
}

const LINE_CAPACITY: usize = 512;

/// One rendered diagnostic line, held on the stack. Output past the
/// capacity is dropped so rendering itself can never fail.
pub struct FatalLine {
    buf: [u8; LINE_CAPACITY],
    len: usize,
}

impl FatalLine {
    /// `[tsafe][<pid>] <reason>: <name> (<prototype>)`
    pub fn render(pid: i32, symbol: Symbol, reason: Fatal) -> Self {
        let mut line = Self {
            buf: [0; LINE_CAPACITY],
            len: 0,
        };
        let _ = writeln!(
            line,
            "[tsafe][{}] {}: {} ({})",
            pid,
            reason.describe(),
            symbol.name(),
            symbol.prototype()
        );
        line
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Best effort: stops at the first short or failed write.
    fn write_to_stderr(&self) {
        let mut rest = self.as_bytes();
        while !rest.is_empty() {
            let n = unsafe { libc::write(2, rest.as_ptr() as *const libc::c_void, rest.len()) };
            if n <= 0 {
                break;
            }
            rest = &rest[n as usize..];
        }
    }
}

impl Write for FatalLine {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        let room = LINE_CAPACITY - self.len;
        let take = s.len().min(room);
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

/// Report and terminate the process.
pub fn fatal(symbol: Symbol, reason: Fatal) -> ! {
    let pid = unsafe { libc::getpid() };
    FatalLine::render(pid, symbol, reason).write_to_stderr();
    log_guard_error!(
        "Aborting process",
        symbol = symbol.name(),
        reason = reason.describe()
    );
    unsafe { libc::abort() }
}
