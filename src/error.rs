//! Failures carried in an effect's error channel.

use thiserror::Error;

/// Errors raised by steps, enumerators and the effects that drive them.
#[derive(Debug, Error)]
pub enum Error {
    /// A step was still awaiting input after it received end of input.
    #[error("diverging iteratee: step did not complete after end of input")]
    Diverging,

    /// Reading from or opening an OS resource failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A failure raised by user code.
    #[error("{0}")]
    Message(String),

    /// Both the driven computation and its finalizer failed.
    #[error("finalizer failed: {finalizer} (while handling: {primary})")]
    Finalizer {
        primary: Box<Error>,
        finalizer: Box<Error>,
    },
}

impl Error {
    /// Build an [`Error::Message`] from anything printable.
    pub fn msg(message: impl std::fmt::Display) -> Self {
        Error::Message(message.to_string())
    }

    /// Returns `true` for [`Error::Diverging`].
    pub fn is_diverging(&self) -> bool {
        matches!(self, Error::Diverging)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
