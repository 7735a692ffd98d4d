//! # mailroom-imap
//!
//! An IMAP mailbox client session: state-guarded operations over a
//! pluggable transport, modified UTF-7 mailbox names, and decoding of
//! fetched messages into displayable emails and attachments on disk.
//!
//! ## Features
//!
//! - **State guards**: every operation checks the session has connected,
//!   logged in or selected a mailbox as needed, and fails with a distinct
//!   error before anything is sent
//! - **Pluggable transport**: the wire protocol, TLS and timeouts live
//!   behind the [`Connector`] and [`Connection`] traits
//! - **Mailbox names**: modified UTF-7 encoding and decoding (RFC 3501)
//! - **Message decoding**: RFC 2047 headers, charsets, nested multipart,
//!   HTML to text, attachment extraction
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailroom_imap::{ListOrder, Session, SeqNum};
//!
//! let mut session = Session::new(connector);
//! session.connect("imap.example.com", 993)?;
//! session.login("user@example.com", "password")?;
//!
//! // Folder names arrive decoded
//! for mailbox in session.list_mailboxes()?.unwrap_or_default() {
//!     println!("Folder: {mailbox}");
//! }
//!
//! session.select_mailbox("Входящие")?;
//! for email in session.list_emails(ListOrder::NewestFirst)? {
//!     let email = email?;
//!     println!("{} {:?} {:?}", email.id(), email.sender(), email.subject());
//! }
//!
//! session.download_attachments(SeqNum::new(1), "/tmp")?;
//! session.upload_email("Hello", "Body", "friend@example.com")?;
//! session.close()?;
//! ```
//!
//! ## Session States
//!
//! ```text
//! ┌─────────────────────┐
//! │    Disconnected     │ ─── connect() ───→ Connected
//! └─────────────────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │      Connected      │ ─── login() ───→ Authenticated
//! └─────────────────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │    Authenticated    │ ─── select_mailbox() OK ───→ Selected
//! └─────────────────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │      Selected       │ ─── select_mailbox() not OK ───→ Authenticated
//! └─────────────────────┘
//!
//! close() from any state ───→ Disconnected
//! ```
//!
//! ## Modules
//!
//! - [`mailbox_name`]: Modified UTF-7 codec
//! - [`time`]: Clock abstraction for message dates
//! - [`transport`]: Transport traits
//! - [`types`]: Core IMAP types (sequence numbers, statuses, mailboxes)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod attachment;
mod config;
mod email;
mod error;
mod session;
mod state;

pub mod mailbox_name;
pub mod time;
pub mod transport;
pub mod types;

pub use attachment::extract_attachments;
pub use config::{Config, ConfigBuilder, DEFAULT_CONNECT_TIMEOUT, DEFAULT_UPLOAD_MAILBOX, Security};
pub use email::Email;
pub use error::{Error, Result};
pub use session::{Emails, ListOrder, Session};
pub use state::SessionState;
pub use transport::{Connection, Connector, FetchPart, Reply};
pub use types::{ListResponse, Mailbox, MailboxAttribute, SeqNum, Status};

/// MIME parsing and message building, re-exported for callers that need to
/// inspect raw messages.
pub use mailroom_mime as mime;
