//! Errors that abort a run.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The output device could not be found, opened or configured.
    #[error("Device error: {0}")]
    Device(String),

    /// A frequency, duration or sample rate that can't be played.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A sequence that would never terminate.
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}
