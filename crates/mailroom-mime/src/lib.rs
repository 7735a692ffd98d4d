//! # mailroom-mime
//!
//! MIME message parsing and plain-text message generation for email.
//!
//! ## Features
//!
//! - **Message parsing**: Parse MIME messages into a tree of parts
//! - **Rendering**: Walk a message into the text a reader displays
//! - **Header decoding**: RFC 2047 encoded-words and RFC 2231 filenames
//! - **Charsets**: Any charset `encoding_rs` knows, with UTF-8 fallback
//! - **Message generation**: Plain-text RFC 5322 messages
//!
//! ## Quick Start
//!
//! ### Parsing MIME Messages
//!
//! ```
//! use mailroom_mime::{Message, header};
//!
//! let raw = b"From: =?utf-8?B?0K/QvQ==?= <jan@example.com>\r\n\
//!             Subject: Test\r\n\
//!             Content-Type: text/html\r\n\
//!             \r\n\
//!             <p>Hello, <b>World</b>!</p>";
//!
//! let message = Message::parse(raw);
//! let from = header::decode_field(message.from()).unwrap_or_default();
//! assert_eq!(from, "Ян <jan@example.com>");
//! assert_eq!(header::extract_address(&from), "jan@example.com");
//!
//! let body: Vec<_> = message.components().iter().map(|c| c.display_text().to_string()).collect();
//! assert_eq!(body, ["Hello, World!"]);
//! ```
//!
//! ### Building Messages
//!
//! ```
//! use mailroom_mime::OutgoingMessage;
//!
//! let bytes = OutgoingMessage::new("sender@example.com", "Test Message", "Hello, World!")
//!     .to("recipient@example.com")
//!     .to_rfc5322();
//! assert!(bytes.starts_with(b"From: sender@example.com\r\n"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod builder;
mod content_type;
mod error;
mod html;
mod message;

pub mod charset;
pub mod encoding;
pub mod header;

pub use builder::{OutgoingMessage, build_text_message};
pub use content_type::{ContentDisposition, ContentType};
pub use error::{Error, Result};
pub use header::Headers;
pub use html::html_to_text;
pub use message::{Body, Component, Message, Part, TransferEncoding};
