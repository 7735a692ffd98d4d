//! Error types for the IMAP session.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during session operations.
///
/// Statuses other than OK are not errors: operations report them through
/// `None`, empty results, or the returned [`Reply`](crate::Reply).
#[derive(Debug, Error)]
pub enum Error {
    /// The operation needs a connection and the session has none.
    #[error("must connect first")]
    NotConnected,

    /// The operation needs an authenticated session.
    #[error("must authenticate first")]
    NotAuthenticated,

    /// The operation needs a selected mailbox.
    #[error("must select a mailbox first")]
    NoMailboxSelected,

    /// Malformed modified UTF-7 mailbox name.
    #[error("Invalid mailbox name encoding: {0}")]
    Encoding(String),

    /// I/O error from the transport or an attachment write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation timed out.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// Failure reported by the transport.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
