use std::error::Error;
use std::fmt;
use std::io;

/// An error type indicating an unsuccessful population
/// or innovation-registry load.
///
/// Saving and loading are the only recoverable operations in the
/// crate; every other precondition violation is a programmer error
/// and panics.
#[derive(Debug)]
pub enum LoadError {
    /// The underlying reader failed.
    Io(io::Error),
    /// A line did not match the expected format. Carries the
    /// offending line.
    Malformed(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "load failed: {}", e),
            Self::Malformed(line) => write!(f, "malformed line in snapshot: {:?}", line),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Malformed(_) => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> LoadError {
        LoadError::Io(e)
    }
}
