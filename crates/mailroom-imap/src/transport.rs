//! Transport abstraction.
//!
//! The session never speaks the IMAP wire protocol itself. A [`Connector`]
//! opens connections and each [`Connection`] runs one command per call,
//! returning the completion [`Status`] together with the raw response data.
//! Sockets, TLS, timeouts and response framing all live behind these
//! traits.

use crate::config::Config;
use crate::error::Result;
use crate::types::{SeqNum, Status};

/// Completion status of a command plus its raw data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply<T = Vec<u8>> {
    /// Completion status.
    pub status: Status,
    /// Raw response data.
    pub data: T,
}

impl<T> Reply<T> {
    /// Creates a reply.
    #[must_use]
    pub const fn new(status: Status, data: T) -> Self {
        Self { status, data }
    }

    /// Creates an OK reply.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self::new(Status::Ok, data)
    }

    /// Returns `true` if the command completed with OK.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

/// One element of a FETCH reply.
///
/// The transport decides once which elements carry message data, so
/// nothing downstream has to guess from the shape of the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPart {
    /// A message literal (`RFC822` bytes).
    Data(Vec<u8>),
    /// Anything else the server sent alongside (flags, closing parens, ...).
    Other(Vec<u8>),
}

impl FetchPart {
    /// Returns the message bytes if this part carries them.
    #[must_use]
    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            Self::Data(bytes) => Some(bytes),
            Self::Other(_) => None,
        }
    }
}

/// Opens transport connections.
pub trait Connector {
    /// Connection type produced.
    type Connection: Connection;

    /// Connects to the server described by `config`.
    ///
    /// `config.security` and `config.connect_timeout` are for the transport
    /// to honor.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is unreachable or the timeout expires.
    fn connect(&mut self, config: &Config) -> Result<Self::Connection>;
}

/// An open connection, one method per IMAP command the session uses.
///
/// Every method returns `Err` only for transport failures (I/O, timeout).
/// A server refusing a command is an `Ok` reply with a non-OK status.
#[allow(clippy::missing_errors_doc)]
pub trait Connection {
    /// LOGIN.
    fn login(&mut self, username: &str, password: &str) -> Result<Reply>;

    /// LIST `""` `*`; one raw line per mailbox.
    fn list(&mut self) -> Result<Reply<Vec<Vec<u8>>>>;

    /// SELECT of a wire-encoded mailbox name.
    fn select(&mut self, mailbox: &str) -> Result<Reply>;

    /// SEARCH; raw lines of space-separated sequence numbers.
    fn search(&mut self, criteria: &str) -> Result<Reply<Vec<Vec<u8>>>>;

    /// FETCH of one message.
    fn fetch(&mut self, id: SeqNum, items: &str) -> Result<Reply<Vec<FetchPart>>>;

    /// APPEND to a wire-encoded mailbox name.
    fn append(
        &mut self,
        mailbox: &str,
        flags: &str,
        internal_date: &str,
        message: &[u8],
    ) -> Result<Reply>;

    /// LOGOUT.
    fn logout(&mut self) -> Result<Reply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_status() {
        assert!(Reply::ok(Vec::<u8>::new()).is_ok());
        assert!(!Reply::new(Status::No, b"denied".to_vec()).is_ok());
        assert!(!Reply::new(Status::parse("bye"), ()).is_ok());
    }

    #[test]
    fn test_fetch_part_data() {
        assert_eq!(FetchPart::Data(b"x".to_vec()).as_data(), Some(b"x".as_slice()));
        assert_eq!(FetchPart::Other(b")".to_vec()).as_data(), None);
    }
}
