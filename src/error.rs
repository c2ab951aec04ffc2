//! Error types for the luakv binding layer.

use std::fmt;

/// The result type used throughout luakv.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for luakv operations.
///
/// These errors are host-facing only. Errors that cross the Lua boundary are
/// flattened to script values (`false`, the empty string, or a
/// `(nil, message, 1)` triple) and never carry this type.
#[derive(Debug)]
pub enum Error {
    /// The connection pool has been closed; no store operation can proceed.
    PoolClosed,

    /// A store operation failed.
    Store(String),

    /// A Lua script failed to parse or run.
    Script(String),

    /// An invalid argument was provided.
    InvalidArgument(String),
}

impl Error {
    /// Creates a new store error.
    pub fn store(msg: impl Into<String>) -> Self {
        Error::Store(msg.into())
    }

    /// Creates a new script error.
    pub fn script(msg: impl Into<String>) -> Self {
        Error::Script(msg.into())
    }

    /// Creates a new invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PoolClosed => write!(f, "Connection pool is closed"),
            Error::Store(msg) => write!(f, "Store error: {}", msg),
            Error::Script(msg) => write!(f, "Script error: {}", msg),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<mlua::Error> for Error {
    fn from(err: mlua::Error) -> Self {
        Error::Script(err.to_string())
    }
}
