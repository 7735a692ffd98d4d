//! MIME encoding and decoding utilities.
//!
//! Supports Base64, Quoted-Printable, and RFC 2047 header decoding.

use base64::Engine;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;

use crate::charset;
use crate::error::Result;

/// Standard alphabet, accepting input with or without padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes Base64 data.
///
/// Whitespace (line breaks in transfer-encoded bodies) is ignored and
/// padding is optional.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &[u8]) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    LENIENT.decode(cleaned).map_err(Into::into)
}

/// Decodes Quoted-Printable data (RFC 2045).
///
/// Decoding is permissive: an `=` that does not start a soft line break or
/// a valid hex escape is kept literally, as most agents do.
#[must_use]
pub fn decode_quoted_printable(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len());
    let mut i = 0;

    while i < data.len() {
        let byte = data[i];
        if byte != b'=' {
            result.push(byte);
            i += 1;
            continue;
        }

        match &data[i + 1..] {
            // Soft line breaks
            [b'\r', b'\n', ..] => i += 3,
            [b'\n', ..] => i += 2,
            [hi, lo, ..] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                result.push((hex_value(*hi) << 4) | hex_value(*lo));
                i += 3;
            }
            _ => {
                result.push(b'=');
                i += 1;
            }
        }
    }

    result
}

const fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

/// Decodes every RFC 2047 encoded-word in a header value.
///
/// Format: `=?charset?encoding?encoded-text?=`
///
/// Text outside encoded-words is kept as is; whitespace between two
/// adjacent encoded-words is dropped. An encoded-word whose payload cannot
/// be decoded is kept verbatim, so a corrupt header degrades instead of
/// failing.
#[must_use]
pub fn decode_rfc2047(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut after_word = false;

    while let Some(start) = rest.find("=?") {
        let (before, candidate) = rest.split_at(start);

        if let Some((word, consumed)) = EncodedWord::parse(candidate) {
            if !(after_word && before.chars().all(char::is_whitespace)) {
                out.push_str(before);
            }
            out.push_str(&word.decode());
            rest = &candidate[consumed..];
            after_word = true;
        } else {
            out.push_str(before);
            out.push_str("=?");
            rest = &candidate[2..];
            after_word = false;
        }
    }

    out.push_str(rest);
    out
}

/// One `=?charset?encoding?text?=` token.
#[derive(Debug)]
struct EncodedWord<'a> {
    raw: &'a str,
    charset: &'a str,
    encoding: char,
    text: &'a str,
}

impl<'a> EncodedWord<'a> {
    /// Parses an encoded-word at the start of `s`, returning it and the
    /// number of bytes it spans.
    fn parse(s: &'a str) -> Option<(Self, usize)> {
        let body = s.strip_prefix("=?")?;
        let (charset, rest) = body.split_once('?')?;
        let (encoding, rest) = rest.split_once('?')?;
        let end = rest.find("?=")?;
        let text = &rest[..end];

        let mut encoding_chars = encoding.chars();
        let encoding = encoding_chars.next()?.to_ascii_uppercase();
        if encoding_chars.next().is_some()
            || !matches!(encoding, 'B' | 'Q')
            || charset.is_empty()
            || charset.contains(char::is_whitespace)
            || text.contains(char::is_whitespace)
        {
            return None;
        }

        // charset, '?', encoding, '?', text, "?=" after the leading "=?"
        let consumed = 2 + charset.len() + 3 + text.len() + 2;
        let word = Self {
            raw: &s[..consumed],
            // RFC 2231 allows a language suffix: `utf-8*en`
            charset: charset.split('*').next().unwrap_or(charset),
            encoding,
            text,
        };
        Some((word, consumed))
    }

    fn decode(&self) -> String {
        let bytes = if self.encoding == 'B' {
            match decode_base64(self.text.as_bytes()) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(word = self.raw, error = %e, "Malformed encoded-word kept verbatim");
                    return self.raw.to_string();
                }
            }
        } else {
            // `_` stands for a space regardless of charset
            let text: Vec<u8> = self
                .text
                .bytes()
                .map(|b| if b == b'_' { b' ' } else { b })
                .collect();
            decode_quoted_printable(&text)
        };

        charset::decode(&bytes, Some(self.charset))
    }
}
