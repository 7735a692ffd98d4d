//! Outgoing plain-text message composition.

use std::fmt::Write;

/// A plain-text email ready to be serialized for upload or sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Sender address.
    pub from: String,
    /// Recipient addresses.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
}

impl OutgoingMessage {
    /// Creates a new outgoing message without recipients.
    #[must_use]
    pub fn new(
        from: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: Vec::new(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Adds a recipient.
    #[must_use]
    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.to.push(recipient.into());
        self
    }

    /// Serializes the message in RFC 5322 form.
    ///
    /// Header values have line breaks replaced by spaces so they cannot
    /// inject further headers. The body is sent as 8-bit UTF-8 with CRLF
    /// line endings and always ends with a line break.
    #[must_use]
    pub fn to_rfc5322(&self) -> Vec<u8> {
        let mut message = String::new();

        let _ = write!(message, "From: {}\r\n", header_value(&self.from));

        if !self.to.is_empty() {
            let _ = write!(message, "To: {}\r\n", header_list(&self.to));
        }

        let _ = write!(message, "Subject: {}\r\n", header_value(&self.subject));
        message.push_str("MIME-Version: 1.0\r\n");
        message.push_str("Content-Type: text/plain; charset=utf-8\r\n");
        message.push_str("Content-Transfer-Encoding: 8bit\r\n");

        // Empty line between headers and body
        message.push_str("\r\n");

        for line in self.body.lines() {
            message.push_str(line);
            message.push_str("\r\n");
        }
        if self.body.is_empty() {
            message.push_str("\r\n");
        }

        message.into_bytes()
    }
}

/// Builds a single-recipient plain-text message.
#[must_use]
pub fn build_text_message(from: &str, subject: &str, body: &str, to: &str) -> Vec<u8> {
    OutgoingMessage::new(from, subject, body).to(to).to_rfc5322()
}

fn header_value(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

fn header_list(values: &[String]) -> String {
    values
        .iter()
        .map(|value| header_value(value))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    #[test]
    fn test_build_text_message_headers() {
        let bytes = build_text_message("me@example.com", "Hello", "Body text", "you@example.com");
        let text = String::from_utf8(bytes).unwrap_or_default();

        assert!(text.starts_with("From: me@example.com\r\nTo: you@example.com\r\nSubject: Hello\r\n"));
        assert!(text.contains("Content-Type: text/plain; charset=utf-8\r\n"));
        assert!(text.ends_with("\r\n\r\nBody text\r\n"));
    }

    #[test]
    fn test_body_line_endings_normalized() {
        let bytes = OutgoingMessage::new("a@b", "s", "one\ntwo\r\nthree\n").to_rfc5322();
        assert!(bytes.ends_with(b"\r\n\r\none\r\ntwo\r\nthree\r\n"));
    }

    #[test]
    fn test_header_injection_flattened() {
        let bytes =
            build_text_message("a@b", "Hi\r\nBcc: evil@example.com", "x", "c@d");
        let message = Message::parse(&bytes);
        assert_eq!(message.subject(), Some("Hi  Bcc: evil@example.com"));
        assert!(message.headers().get("bcc").is_none());
    }

    #[test]
    fn test_multiple_recipients() {
        let bytes = OutgoingMessage::new("a@b", "s", "")
            .to("x@y")
            .to("z@w")
            .to_rfc5322();
        let message = Message::parse(&bytes);
        assert_eq!(message.to(), Some("x@y, z@w"));
        assert!(bytes.ends_with(b"8bit\r\n\r\n\r\n"));
    }

    #[test]
    fn test_unicode_round_trips_through_parser() {
        let bytes = build_text_message("я@пример.рф", "Тема", "Привет", "b@c");
        let message = Message::parse(&bytes);
        let texts: Vec<_> = message
            .components()
            .iter()
            .map(|c| c.display_text().to_string())
            .collect();
        assert_eq!(texts, ["Привет\r\n"]);
        assert_eq!(message.subject(), Some("Тема"));
    }
}
