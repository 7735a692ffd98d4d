//! MIME header handling.

use std::collections::HashMap;

use crate::encoding::decode_rfc2047;

/// Collection of email headers.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    headers: HashMap<String, Vec<String>>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_lowercase();
        let value = value.into();
        self.headers.entry(name).or_default().push(value);
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|v| v.first().map(String::as_str))
    }

    /// Returns `true` if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Parses a header block from the start of `data`.
    ///
    /// Returns the headers and the remaining bytes, which are the body.
    ///
    /// ```text
    /// Header-Name: value
    ///   continuation
    /// ```
    ///
    /// The block ends at the first empty line. A line that is neither a
    /// continuation nor a `name: value` field also ends the block and is
    /// kept as the first line of the body, the way lenient mail parsers
    /// treat a missing separator.
    #[must_use]
    pub fn parse(data: &[u8]) -> (Self, &[u8]) {
        let mut headers = Self::new();
        let mut current: Option<(String, String)> = None;
        let mut offset = 0;

        while offset < data.len() {
            let line_end = data[offset..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(data.len(), |i| offset + i + 1);
            let line = trim_line_ending(&data[offset..line_end]);

            if line.is_empty() {
                offset = line_end;
                break;
            }

            if line[0] == b' ' || line[0] == b'\t' {
                if let Some((_, value)) = current.as_mut() {
                    value.push(' ');
                    value.push_str(String::from_utf8_lossy(line).trim());
                }
                offset = line_end;
                continue;
            }

            let Some((name, value)) = split_field(line) else {
                break;
            };

            if let Some((name, value)) = current.take() {
                headers.add(name, value);
            }
            current = Some((name, value));
            offset = line_end;
        }

        if let Some((name, value)) = current {
            headers.add(name, value);
        }

        (headers, &data[offset..])
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Splits `Name: value`, rejecting names that contain whitespace or control
/// characters.
fn split_field(line: &[u8]) -> Option<(String, String)> {
    let colon = line.iter().position(|&b| b == b':')?;
    let name = &line[..colon];
    if name.is_empty() || !name.iter().all(|b| b.is_ascii_graphic()) {
        return None;
    }

    let name = String::from_utf8_lossy(name).into_owned();
    let value = String::from_utf8_lossy(&line[colon + 1..]).trim().to_string();
    Some((name, value))
}

/// Decodes a raw header field into plain text.
///
/// Returns `None` when the header is absent. Encoded-words are decoded with
/// the charset they declare (UTF-8 when it is missing or `unknown-8bit`);
/// anything undecodable degrades to lossy text rather than an error.
#[must_use]
pub fn decode_field(raw: Option<&str>) -> Option<String> {
    raw.map(decode_rfc2047)
}

/// Returns the bare address from a decoded `From`-style value.
///
/// `"Jane Doe <jane@example.com>"` yields `jane@example.com`; text without
/// an angle-bracket address is returned unchanged.
#[must_use]
pub fn extract_address(decoded: &str) -> &str {
    decoded
        .rfind('<')
        .and_then(|start| {
            let rest = &decoded[start + 1..];
            rest.find('>').map(|end| rest[..end].trim())
        })
        .filter(|address| !address.is_empty())
        .unwrap_or(decoded)
}
