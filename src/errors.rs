//! Crate-wide error taxonomy.
//!
//! Every failure that can occur while driving a request to completion is
//! collapsed into [`ErrorKind`], which knows how to render itself as an HTTP
//! status line and reason phrase. Nothing below worker-loop level ever
//! returns a raw [`std::io::Error`] to its caller without wrapping it first.

use std::{error, fmt, io, num::ParseIntError};

/// A single failure mode, grounded in the taxonomy of component 4.J.
#[derive(Debug)]
pub(crate) enum ErrorKind {
    /// Malformed request line or headers.
    ParseError,
    /// Request exceeded the 8 KiB read buffer before completing.
    ReqTooLong,
    /// Read or write on the client socket failed.
    Io(io::Error),
    /// Resolved path is not a regular file, or `open` returned `ENOENT`.
    NotFound,
    /// `POST` to a directory or to a non-executable file.
    Forbidden,
    /// Method is not one of `GET`, `POST`, `OPTIONS`.
    MethodNotAllowed,
    /// Spawned interpreter produced no stdout.
    ExecError,
    /// Allocation, `mmap`, or internal invariant failure.
    InternalError,
}

macro_rules! status_line {
    ($($variant:ident => ($code:literal, $reason:literal);)*) => {
        impl ErrorKind {
            /// Status code and reason phrase this error surfaces as.
            pub(crate) const fn status(&self) -> (u16, &'static str) {
                match self {
                    $(ErrorKind::$variant { .. } => ($code, $reason),)*
                }
            }
        }
    };
}

status_line! {
    ParseError => (400, "Bad request");
    ReqTooLong => (400, "Request too long");
    Io => (500, "Internal server error");
    NotFound => (404, "Not found");
    Forbidden => (403, "Can't POST there");
    MethodNotAllowed => (405, "Not supported");
    ExecError => (500, "Execution error");
    InternalError => (500, "Internal error");
}

impl error::Error for ErrorKind {}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Io(e) => write!(f, "io error: {e}"),
            other => {
                let (code, reason) = other.status();
                write!(f, "{code} {reason}")
            }
        }
    }
}

impl From<io::Error> for ErrorKind {
    fn from(err: io::Error) -> Self {
        ErrorKind::Io(err)
    }
}

/// Failure modes for the typed configuration store (4.A).
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No entry exists under the given name.
    NotFound,
    /// The entry exists but was inserted as the other type.
    WrongType,
    /// A supplied value could not be parsed into the requested type
    /// (e.g. an integer that doesn't fit `i32`).
    BadArguments,
    /// Insertion was attempted for a name that's already present.
    AlreadyExists,
}

impl error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::NotFound => "no such configuration key",
            ConfigError::WrongType => "configuration key has a different type",
            ConfigError::BadArguments => "value could not be parsed",
            ConfigError::AlreadyExists => "configuration key already inserted",
        };
        f.write_str(msg)
    }
}

impl From<ParseIntError> for ConfigError {
    fn from(_: ParseIntError) -> Self {
        ConfigError::BadArguments
    }
}

/// Failure modes for loading the MIME association table (4.B).
#[derive(Debug, PartialEq, Eq)]
pub enum MimeError {
    /// The file could not be read at all.
    Io,
    /// The file was read but not a single line produced a valid association.
    EmptyTable,
}

impl error::Error for MimeError {}

impl fmt::Display for MimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MimeError::Io => f.write_str("could not read MIME association file"),
            MimeError::EmptyTable => f.write_str("MIME association file had no valid entries"),
        }
    }
}
