//! Error type used by the crate.

use thiserror::Error;

/// Error reading an ASCII grid.
#[derive(Debug, Error)]
pub enum TesseraAscError {
    /// Header is missing a required key, has an unknown key or an invalid value.
    #[error("invalid grid header: {0}")]
    Header(String),
    /// Grid values cannot be parsed or their number does not match the header.
    #[error("invalid grid data: {0}")]
    Data(String),
    /// Reading failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
