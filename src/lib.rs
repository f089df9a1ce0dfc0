//! Sensu checks and graphite metrics for MySQL
//!
//! Every binary in this crate follows the same shape: resolve credentials,
//! open one connection, run one or two diagnostic statements, turn the
//! results into a [`Report`] and exit with the matching [`Status`].
//!
//! The decision logic lives in this library so that it can be tested
//! without a server. See the [`scripts`] module for the command line of
//! each binary.

use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::sync::Mutex;

pub mod connection;
pub mod disk;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod replication;
pub mod scripts;
pub mod server;
pub mod thresholds;

pub use crate::error::CheckError;

/// All possible exit statuses for a check, ordered by severity
#[must_use]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Exit with a return code that indicates the state of the system
    pub fn exit(self) -> ! {
        process::exit(self.code())
    }

    /// The process exit code understood by the monitoring host
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        };
        write!(f, "{}", msg)
    }
}

/// The single result of a check: a severity and the line to print for it
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Report {
    pub status: Status,
    pub message: String,
}

impl Report {
    pub fn new<S: Into<String>>(status: Status, message: S) -> Report {
        Report {
            status,
            message: message.into(),
        }
    }

    pub fn ok<S: Into<String>>(message: S) -> Report {
        Report::new(Status::Ok, message)
    }

    pub fn warning<S: Into<String>>(message: S) -> Report {
        Report::new(Status::Warning, message)
    }

    pub fn critical<S: Into<String>>(message: S) -> Report {
        Report::new(Status::Critical, message)
    }

    pub fn unknown<S: Into<String>>(message: S) -> Report {
        Report::new(Status::Unknown, message)
    }

    /// The line that gets written to stdout, if any
    ///
    /// Metric emitters finish with an empty ok report and print nothing.
    pub fn output_line(&self, name: &str) -> Option<String> {
        if self.message.is_empty() {
            None
        } else {
            Some(format!("[{}] {}: {}", name, self.status, self.message))
        }
    }

    pub fn print_and_exit(self, name: &str) -> ! {
        if let Some(line) = self.output_line(name) {
            println!("{}", line);
        }
        self.status.exit()
    }
}

/// Held while the capture hook is installed
static HOOK_LOCK: Mutex<()> = Mutex::new(());

thread_local! {
    static PANIC_TRACE: RefCell<Option<String>> = RefCell::new(None);
}

/// Run a check, converting every failure into a `Report`
///
/// Anything the closure owns (in particular the database connection) has
/// been dropped by the time this returns, whether the check succeeded,
/// returned an error or panicked. Only then is it safe to call
/// `Report::print_and_exit`, which does not run destructors.
pub fn run<F>(check: F) -> Report
where
    F: FnOnce() -> Result<Report, CheckError>,
{
    let result = {
        let _swap = HOOK_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = panic::take_hook();
        panic::set_hook(Box::new(|info| {
            let trace = format!("{}\n{}", info, Backtrace::force_capture());
            PANIC_TRACE.with(|slot| *slot.borrow_mut() = Some(trace));
        }));
        let result = panic::catch_unwind(AssertUnwindSafe(check));
        panic::set_hook(previous);
        result
    };

    match result {
        Ok(Ok(report)) => report,
        Ok(Err(err)) => {
            tracing::debug!(error = ?err, "check failed");
            err.report()
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "check panicked".to_owned());
            let trace = PANIC_TRACE.with(|slot| slot.borrow_mut().take());
            match trace {
                Some(trace) => Report::unknown(format!("{}\n\n{}", message, trace)),
                None => Report::unknown(message),
            }
        }
    }
}
