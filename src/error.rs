//! Unified error type for all store operations.
//!
//! Not-found is deliberately *not* an error: lookups return `Option` and
//! deletes return `bool`, so callers can branch without exception-style
//! control flow.

/// Things that can go wrong when using the store.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// File system problem (read, write, rename) other than the file simply
    /// not existing yet.
    Io(String),
    /// The backing file exists but does not parse as a database. Fatal for
    /// the current call; no auto-repair is attempted.
    Corrupt(String),
    /// Failed to serialize the database (or a typed record) to JSON.
    Serialize(String),
    /// `create` was called with a record lacking a non-empty string `id`.
    MissingId,
    /// `create` was called with an `id` already present in the collection.
    DuplicateId(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Corrupt(msg) => write!(f, "corrupt database file: {msg}"),
            Error::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Error::MissingId => write!(f, "record is missing a non-empty string `id` field"),
            Error::DuplicateId(id) => write!(f, "a record with id `{id}` already exists"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() || err.is_data() {
            Error::Corrupt(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
