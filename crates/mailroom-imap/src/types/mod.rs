//! Core IMAP types.
//!
//! Sequence numbers, command statuses and mailbox listings, as the session
//! receives them from its transport.

mod identifiers;
mod mailbox;
mod status;

pub use identifiers::{SeqNum, parse_search_ids};
pub use mailbox::{ListResponse, Mailbox, MailboxAttribute};
pub use status::Status;
