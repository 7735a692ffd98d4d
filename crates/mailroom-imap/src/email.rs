//! Fetched email entity.

use mailroom_mime::Message;
use mailroom_mime::header::{decode_field, extract_address};

use crate::types::SeqNum;

/// One fetched message, decoded for display.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Email {
    id: SeqNum,
    sender: Option<String>,
    subject: Option<String>,
    body: Vec<String>,
}

impl Email {
    /// Creates an email with no headers and an empty body.
    #[must_use]
    pub const fn new(id: SeqNum) -> Self {
        Self {
            id,
            sender: None,
            subject: None,
            body: Vec::new(),
        }
    }

    /// Builds an email from raw RFC 822 bytes.
    ///
    /// The sender is the bare address from `From` when it has one, else the
    /// decoded header text. The body holds one entry per rendered leaf, in
    /// document order: the text of `text/plain` and `text/html` parts, and
    /// the filename of each attachment as a placeholder. Malformed headers
    /// and parts degrade to best-effort text instead of failing.
    #[must_use]
    pub fn from_bytes(id: SeqNum, raw: &[u8]) -> Self {
        let message = Message::parse(raw);

        let mut email = Self::new(id);
        email.sender =
            decode_field(message.from()).map(|from| extract_address(&from).to_string());
        email.subject = decode_field(message.subject());

        for component in message.components() {
            email.add_body_component(component.display_text());
        }

        email
    }

    /// Appends one entry to the body.
    pub fn add_body_component(&mut self, text: impl Into<String>) {
        self.body.push(text.into());
    }

    /// Server sequence number the email was fetched under.
    #[must_use]
    pub const fn id(&self) -> SeqNum {
        self.id
    }

    /// Sender address, if the message has a `From` header.
    #[must_use]
    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    /// Decoded subject, if the message has one.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Body entries in document order.
    #[must_use]
    pub fn body(&self) -> &[String] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_message() {
        let raw = concat!(
            "From: =?utf-8?B?0JjQstCw0L0=?= <ivan@example.com>\r\n",
            "Subject: =?koi8-r?B?8NLJ18XU?=\r\n",
            "\r\n",
            "Hello"
        );
        let email = Email::from_bytes(SeqNum::new(3), raw.as_bytes());

        assert_eq!(email.id(), SeqNum::new(3));
        assert_eq!(email.sender(), Some("ivan@example.com"));
        assert_eq!(email.subject(), Some("Привет"));
        assert_eq!(email.body(), ["Hello"]);
    }

    #[test]
    fn test_missing_headers() {
        let email = Email::from_bytes(SeqNum::new(1), b"Content-Type: multipart\nGood");
        assert_eq!(email.sender(), None);
        assert_eq!(email.subject(), None);
        assert_eq!(email.body(), ["Good"]);
    }

    #[test]
    fn test_html_less_than_sign_kept() {
        let email = Email::from_bytes(
            SeqNum::new(1),
            b"Content-Type: text/html\n\nPrice < 5 EUR, buy now",
        );
        assert_eq!(email.body(), ["Price < 5 EUR, buy now"]);
    }

    #[test]
    fn test_sender_without_brackets() {
        let email = Email::from_bytes(SeqNum::new(1), b"From: plain@example.com\r\n\r\n");
        assert_eq!(email.sender(), Some("plain@example.com"));
    }

    #[test]
    fn test_attachment_placeholder() {
        let raw = concat!(
            "Content-Type: multipart/mixed; boundary=b\r\n",
            "\r\n",
            "--b\r\n",
            "Content-Type: text/html\r\n",
            "\r\n",
            "<p>See attached</p>\r\n",
            "--b\r\n",
            "Content-Type: application/octet-stream\r\n",
            "Content-Disposition: attachment; filename=data.bin\r\n",
            "\r\n",
            "xyz\r\n",
            "--b--\r\n",
        );
        let email = Email::from_bytes(SeqNum::new(9), raw.as_bytes());
        assert_eq!(email.body(), ["See attached", "data.bin"]);
    }

    #[test]
    fn test_add_body_component() {
        let mut email = Email::new(SeqNum::new(1));
        email.add_body_component("one");
        email.add_body_component(String::from("two"));
        assert_eq!(email.body(), ["one", "two"]);
    }
}
