//! Character set decoding.
//!
//! Text in mail arrives in whatever charset the sender declared, if any.
//! Decoding here never fails: unknown labels fall back to UTF-8 and invalid
//! sequences become U+FFFD.

use encoding_rs::{Encoding, UTF_8};

/// Label some agents use for "8-bit text in an unknown charset".
const UNKNOWN_8BIT: &str = "unknown-8bit";

/// Resolves a charset label to an encoding.
///
/// Absent labels, `unknown-8bit` and labels `encoding_rs` does not know all
/// resolve to UTF-8.
#[must_use]
pub fn resolve(label: Option<&str>) -> &'static Encoding {
    let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) else {
        return UTF_8;
    };

    if label.eq_ignore_ascii_case(UNKNOWN_8BIT) {
        return UTF_8;
    }

    Encoding::for_label_no_replacement(label.as_bytes()).unwrap_or_else(|| {
        tracing::warn!(charset = label, "Unknown charset, decoding as UTF-8");
        UTF_8
    })
}

/// Decodes `bytes` in the given charset, replacing invalid sequences.
#[must_use]
pub fn decode(bytes: &[u8], label: Option<&str>) -> String {
    let encoding = resolve(label);
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        tracing::warn!(
            charset = encoding.name(),
            "Invalid byte sequences replaced while decoding text"
        );
    }
    text.into_owned()
}
