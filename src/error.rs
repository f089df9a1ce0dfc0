//! Errors that end a check early
//!
//! There are exactly two classes: the database said no (critical), or
//! something else went wrong (unknown). Every error in this crate converts
//! into a `CheckError`.

use std::backtrace::Backtrace;
use std::fmt;
use std::io;
use std::num;

use derive_more::From;

use crate::Report;

#[derive(Debug, From)]
pub enum CheckError {
    /// Connection refused, authentication failure, query errors
    Mysql(mysql::Error),
    /// Anything that is not the database's fault
    Unexpected(Unexpected),
}

impl CheckError {
    /// A value that every server reports was not in the result set
    pub fn missing(what: &str) -> CheckError {
        Unexpected::new(format!("no value for {}", what)).into()
    }

    pub fn invalid<D: fmt::Display>(what: &str, value: &str, reason: D) -> CheckError {
        Unexpected::new(format!("invalid {} {:?}: {}", what, value, reason)).into()
    }

    /// Database errors go critical with the server's text, everything else
    /// is unknown and carries its backtrace
    pub fn report(&self) -> Report {
        match *self {
            CheckError::Mysql(ref e) => Report::critical(mysql_message(e)),
            CheckError::Unexpected(ref e) => Report::unknown(e.to_string()),
        }
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CheckError::Mysql(ref e) => write!(f, "{}", mysql_message(e)),
            CheckError::Unexpected(ref e) => write!(f, "{}", e.message),
        }
    }
}

impl std::error::Error for CheckError {}

fn mysql_message(e: &mysql::Error) -> String {
    match *e {
        mysql::Error::MySqlError(ref err) => format!(
            "Error code: {} Error message: {} SQLSTATE: {}",
            err.code, err.message, err.state
        ),
        ref other => other.to_string(),
    }
}

/// An error that is not the database's fault, and where it came from
#[derive(Debug)]
pub struct Unexpected {
    pub message: String,
    backtrace: Backtrace,
}

impl Unexpected {
    pub fn new<S: Into<String>>(message: S) -> Unexpected {
        Unexpected {
            message: message.into(),
            backtrace: Backtrace::force_capture(),
        }
    }
}

impl fmt::Display for Unexpected {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\n\n{}", self.message, self.backtrace)
    }
}

impl From<io::Error> for CheckError {
    fn from(e: io::Error) -> CheckError {
        Unexpected::new(e.to_string()).into()
    }
}

impl From<ini::ParseError> for CheckError {
    fn from(e: ini::ParseError) -> CheckError {
        Unexpected::new(format!("unable to parse ini file: {}", e)).into()
    }
}

impl From<num::ParseIntError> for CheckError {
    fn from(e: num::ParseIntError) -> CheckError {
        Unexpected::new(e.to_string()).into()
    }
}

impl From<num::ParseFloatError> for CheckError {
    fn from(e: num::ParseFloatError) -> CheckError {
        Unexpected::new(e.to_string()).into()
    }
}
