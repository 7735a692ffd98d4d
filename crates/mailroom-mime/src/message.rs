//! MIME message structure and handling.
//!
//! A message is parsed once into a tree of [`Part`]s: leaves carry their
//! (still transfer-encoded) payload, multipart nodes carry their children.
//! [`Part::walk`] turns that tree into the ordered list of renderable
//! components a reader shows.

use std::fmt;

use crate::charset;
use crate::content_type::{ContentDisposition, ContentType};
use crate::encoding::{decode_base64, decode_quoted_printable, decode_rfc2047};
use crate::header::Headers;
use crate::html::html_to_text;

/// Nesting depth past which multipart bodies are kept as opaque leaves.
const MAX_DEPTH: usize = 64;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit, // Default (includes "7bit")
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// Body of a MIME part.
#[derive(Debug, Clone)]
pub enum Body {
    /// Leaf payload, still transfer-encoded.
    Single(Vec<u8>),
    /// Child parts of a `multipart/*` node, in document order.
    Multipart(Vec<Part>),
}

/// MIME message part.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body.
    pub body: Body,
}

/// One entry of a message's rendered body.
#[derive(Debug, Clone)]
pub enum Component<'a> {
    /// Visible text from a `text/plain` or `text/html` leaf.
    Text(String),
    /// A part with `Content-Disposition: attachment`.
    Attachment {
        /// Decoded filename, if the part declares one.
        filename: Option<String>,
        /// The attachment part itself.
        part: &'a Part,
    },
}

impl Component<'_> {
    /// Returns the text shown for this component: the text itself, or the
    /// attachment's filename as a placeholder (empty when it has none).
    #[must_use]
    pub fn display_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Attachment { filename, .. } => filename.as_deref().unwrap_or_default(),
        }
    }
}

impl Part {
    /// Creates a leaf part.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self {
            headers,
            body: Body::Single(body),
        }
    }

    /// Parses a part (or a whole message) from raw bytes.
    ///
    /// Parsing never fails: malformed structure degrades to leaves.
    #[must_use]
    pub fn parse(data: &[u8]) -> Self {
        Self::parse_at_depth(data, 0)
    }

    fn parse_at_depth(data: &[u8], depth: usize) -> Self {
        let (headers, body) = Headers::parse(data);
        let content_type = content_type_of(&headers);

        if content_type.is_multipart() && depth < MAX_DEPTH {
            if let Some(boundary) = content_type.boundary() {
                let children = split_multipart(body, boundary)
                    .into_iter()
                    .map(|child| Self::parse_at_depth(child, depth + 1))
                    .collect();
                return Self {
                    headers,
                    body: Body::Multipart(children),
                };
            }
            tracing::warn!(%content_type, "Multipart part without boundary kept as a leaf");
        }

        Self::new(headers, body.to_vec())
    }

    /// Gets the content type.
    ///
    /// A missing or unparsable header yields `text/plain` without a
    /// charset, as RFC 2045 prescribes for defaults.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        content_type_of(&self.headers)
    }

    /// Gets the content disposition, if the part declares one.
    #[must_use]
    pub fn disposition(&self) -> Option<ContentDisposition> {
        self.headers
            .get("content-disposition")
            .map(ContentDisposition::parse)
    }

    /// Returns `true` if the part is marked as an attachment.
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.disposition()
            .is_some_and(|disposition| disposition.is_attachment())
    }

    /// Returns the decoded filename.
    ///
    /// Looks at the disposition's `filename` (or `filename*`) and then the
    /// content type's `name` parameter.
    #[must_use]
    pub fn filename(&self) -> Option<String> {
        self.disposition()
            .and_then(|disposition| disposition.filename())
            .or_else(|| self.content_type().parameters.get("name").cloned())
            .map(|name| decode_rfc2047(&name))
    }

    /// Gets the transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Returns the child parts (empty for leaves).
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match &self.body {
            Body::Multipart(children) => children,
            Body::Single(_) => &[],
        }
    }

    /// Returns `true` if this part has no children.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.body, Body::Single(_))
    }

    /// Decodes the body according to the transfer encoding.
    ///
    /// A payload that fails to decode is returned as is. Multipart nodes
    /// have no payload of their own and yield an empty vector.
    #[must_use]
    pub fn decode_body(&self) -> Vec<u8> {
        let Body::Single(raw) = &self.body else {
            return Vec::new();
        };

        match self.transfer_encoding() {
            TransferEncoding::Base64 => decode_base64(raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Undecodable base64 payload kept raw");
                raw.clone()
            }),
            TransferEncoding::QuotedPrintable => decode_quoted_printable(raw),
            _ => raw.clone(),
        }
    }

    /// Gets the decoded body as text in the part's charset.
    #[must_use]
    pub fn body_text(&self) -> String {
        charset::decode(&self.decode_body(), self.content_type().charset())
    }

    /// Walks the part tree in document order and returns what a reader
    /// displays.
    ///
    /// - `multipart/alternative` contributes nothing, children included.
    /// - Attachments contribute one [`Component::Attachment`].
    /// - Other `multipart/*` nodes contribute their children's components.
    /// - `text/plain` contributes its decoded text, `text/html` its
    ///   visible text.
    /// - Every other leaf is dropped.
    #[must_use]
    pub fn walk(&self) -> Vec<Component<'_>> {
        let content_type = self.content_type();

        if content_type.is("multipart", "alternative") {
            return Vec::new();
        }

        if self.is_attachment() {
            return vec![Component::Attachment {
                filename: self.filename(),
                part: self,
            }];
        }

        if content_type.is_multipart() {
            return self.children().iter().flat_map(Self::walk).collect();
        }

        if content_type.is("text", "plain") {
            vec![Component::Text(self.body_text())]
        } else if content_type.is("text", "html") {
            vec![Component::Text(html_to_text(&self.body_text()))]
        } else {
            Vec::new()
        }
    }
}

fn content_type_of(headers: &Headers) -> ContentType {
    headers
        .get("content-type")
        .and_then(|value| match ContentType::parse(value) {
            Ok(content_type) => Some(content_type),
            Err(e) => {
                tracing::warn!(error = %e, "Unparsable content type, assuming text/plain");
                None
            }
        })
        .unwrap_or_else(|| ContentType::new("text", "plain"))
}

/// Splits a multipart body into its raw parts.
///
/// The preamble and epilogue are discarded. The line break before each
/// delimiter belongs to the delimiter, not to the preceding part. A body
/// missing its closing delimiter keeps its last part.
fn split_multipart<'a>(body: &'a [u8], boundary: &str) -> Vec<&'a [u8]> {
    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();
    let mut part_start: Option<usize> = None;
    let mut offset = 0;

    while offset < body.len() {
        let line_end = body[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(body.len(), |i| offset + i + 1);
        let line = body[offset..line_end].trim_ascii_end();

        if let Some(rest) = line.strip_prefix(delimiter.as_bytes())
            && (rest.is_empty() || rest.starts_with(b"--"))
        {
            if let Some(start) = part_start {
                parts.push(strip_final_line_break(&body[start..offset]));
            }
            if rest.starts_with(b"--") {
                return parts;
            }
            part_start = Some(line_end);
        }

        offset = line_end;
    }

    if let Some(start) = part_start.filter(|&start| start < body.len()) {
        parts.push(&body[start..]);
    }
    parts
}

fn strip_final_line_break(data: &[u8]) -> &[u8] {
    let data = data.strip_suffix(b"\n").unwrap_or(data);
    data.strip_suffix(b"\r").unwrap_or(data)
}

/// A parsed MIME message.
#[derive(Debug, Clone)]
pub struct Message {
    root: Part,
}

impl Message {
    /// Parses a complete RFC 822 message.
    #[must_use]
    pub fn parse(data: &[u8]) -> Self {
        Self {
            root: Part::parse(data),
        }
    }

    /// Returns the top-level part.
    #[must_use]
    pub const fn root(&self) -> &Part {
        &self.root
    }

    /// Returns the message headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.root.headers
    }

    /// Gets the raw From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.root.headers.get("from")
    }

    /// Gets the raw To header.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.root.headers.get("to")
    }

    /// Gets the raw Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.root.headers.get("subject")
    }

    /// Walks the whole message; see [`Part::walk`].
    #[must_use]
    pub fn components(&self) -> Vec<Component<'_>> {
        self.root.walk()
    }

    /// Returns the attachment leaves, with their decoded filenames, in
    /// document order.
    #[must_use]
    pub fn attachments(&self) -> Vec<(Option<String>, &Part)> {
        self.components()
            .into_iter()
            .filter_map(|component| match component {
                Component::Attachment { filename, part } if part.is_leaf() => {
                    Some((filename, part))
                }
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn texts(message: &Message) -> Vec<String> {
        message
            .components()
            .iter()
            .map(|c| c.display_text().to_string())
            .collect()
    }

    #[test]
    fn test_transfer_encoding_parse() {
        assert_eq!(TransferEncoding::parse("7bit"), TransferEncoding::SevenBit);
        assert_eq!(TransferEncoding::parse("BASE64"), TransferEncoding::Base64);
        assert_eq!(
            TransferEncoding::parse("quoted-printable"),
            TransferEncoding::QuotedPrintable
        );
        assert_eq!(TransferEncoding::parse("x-unknown"), TransferEncoding::SevenBit);
    }

    #[test]
    fn test_single_part_plain() {
        let message = Message::parse(b"Subject: Hi\r\n\r\nHello, World!");
        assert_eq!(message.subject(), Some("Hi"));
        assert_eq!(texts(&message), ["Hello, World!"]);
    }

    #[test]
    fn test_invalid_multipart_type_reads_as_text() {
        let message = Message::parse(b"Content-Type: multipart\nGood");
        assert_eq!(texts(&message), ["Good"]);
    }

    #[test]
    fn test_html_leaf_is_stripped() {
        let message = Message::parse(b"Content-Type: text/html\nGood");
        assert_eq!(texts(&message), ["Good"]);

        let message = Message::parse(
            b"Content-Type: text/html; charset=utf-8\r\n\r\n<p>Hi <i>there</i></p><style>x{}</style>",
        );
        assert_eq!(texts(&message), ["Hi there"]);
    }

    #[test]
    fn test_charset_and_transfer_encoding() {
        let message = Message::parse(concat!(
            "Content-Type: text/plain; charset=koi8-r\r\n",
            "Content-Transfer-Encoding: base64\r\n",
            "\r\n",
            "8NLJ18XU\r\n"
        ).as_bytes());
        assert_eq!(texts(&message), ["Привет"]);
    }

    #[test]
    fn test_quoted_printable_body() {
        let message = Message::parse(
            b"Content-Type: text/plain; charset=utf-8\r\nContent-Transfer-Encoding: quoted-printable\r\n\r\nH=C3=A9llo=\r\n world",
        );
        assert_eq!(texts(&message), ["Héllo world"]);
    }

    #[test]
    fn test_bad_base64_falls_back_to_raw() {
        let message = Message::parse(
            b"Content-Type: text/plain\r\nContent-Transfer-Encoding: base64\r\n\r\n!!not base64!!",
        );
        assert_eq!(texts(&message), ["!!not base64!!"]);
    }

    const MIXED: &str = concat!(
        "From: Jane <jane@example.com>\r\n",
        "Content-Type: multipart/mixed; boundary=\"outer\"\r\n",
        "\r\n",
        "preamble\r\n",
        "--outer\r\n",
        "Content-Type: image/png\r\n",
        "\r\n",
        "PNGDATA\r\n",
        "--outer\r\n",
        "Content-Type: text/plain\r\n",
        "\r\n",
        "First\r\n",
        "--outer\r\n",
        "Content-Type: multipart/alternative; boundary=alt\r\n",
        "\r\n",
        "--alt\r\n",
        "Content-Type: text/plain\r\n",
        "\r\n",
        "Hidden\r\n",
        "--alt--\r\n",
        "--outer\r\n",
        "Content-Type: multipart/related; boundary=rel\r\n",
        "\r\n",
        "--rel\r\n",
        "Content-Type: text/html\r\n",
        "\r\n",
        "<b>Second</b>\r\n",
        "--rel--\r\n",
        "--outer\r\n",
        "Content-Type: application/pdf; name=\"ignored.pdf\"\r\n",
        "Content-Disposition: attachment; filename=\"=?utf-8?B?0J7RgtGH0LXRgg==?=.pdf\"\r\n",
        "Content-Transfer-Encoding: base64\r\n",
        "\r\n",
        "JVBERi0=\r\n",
        "--outer\r\n",
        "Content-Type: text/plain\r\n",
        "Content-Disposition: attachment\r\n",
        "\r\n",
        "no name\r\n",
        "--outer--\r\n",
        "epilogue\r\n",
    );

    #[test]
    fn test_walk_mixed_tree() {
        let message = Message::parse(MIXED.as_bytes());
        assert_eq!(texts(&message), ["First", "Second", "Отчет.pdf", ""]);
        assert_eq!(message.root().children().len(), 6);
    }

    #[test]
    fn test_attachments() {
        let message = Message::parse(MIXED.as_bytes());
        let attachments = message.attachments();
        assert_eq!(attachments.len(), 2);

        let (filename, part) = &attachments[0];
        assert_eq!(filename.as_deref(), Some("Отчет.pdf"));
        assert_eq!(part.decode_body(), b"%PDF-");

        assert_eq!(attachments[1].0, None);
    }

    #[test]
    fn test_filename_from_content_type_name() {
        let part = Part::parse(
            b"Content-Type: image/png; name=\"photo.png\"\r\nContent-Disposition: attachment\r\n\r\nx",
        );
        assert_eq!(part.filename().as_deref(), Some("photo.png"));
    }

    #[test]
    fn test_multipart_without_boundary_is_leaf() {
        let message = Message::parse(b"Content-Type: multipart/mixed\r\n\r\nbody");
        assert!(message.root().is_leaf());
        assert!(message.components().is_empty());
    }

    #[test]
    fn test_unterminated_multipart_keeps_last_part() {
        let message = Message::parse(
            b"Content-Type: multipart/mixed; boundary=b\r\n\r\n--b\r\n\r\nonly\r\n",
        );
        assert_eq!(texts(&message), ["only\r\n"]);
    }

    proptest! {
        #[test]
        fn test_parse_arbitrary_bytes_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
            let message = Message::parse(&data);
            let _ = message.components();
            let _ = message.attachments();
        }
    }

    #[test]
    fn test_split_multipart_lf_endings() {
        let parts = split_multipart(b"--x\nA\n--x\nB\n--x--\n", "x");
        assert_eq!(parts, [b"A".as_slice(), b"B".as_slice()]);
    }
}
