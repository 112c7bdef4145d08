use std::fmt;

/// Result type for lazygrid-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the compute layer
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Row height must be a positive, finite pixel value
    InvalidRowHeight(f64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRowHeight(value) => {
                write!(f, "Invalid row height: {} (must be a positive number)", value)
            }
        }
    }
}

impl std::error::Error for Error {}
