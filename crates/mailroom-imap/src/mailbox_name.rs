//! Modified UTF-7 mailbox names (RFC 3501 section 5.1.3).
//!
//! Printable ASCII travels as is, except `&`, which becomes `&-`. Any other
//! run of characters is encoded as UTF-16BE, then base64 with `,` in place
//! of `/` and no padding, and wrapped as `&...-`.
//!
//! ```
//! use mailroom_imap::mailbox_name;
//!
//! assert_eq!(mailbox_name::encode("Спам"), "&BCEEPwQwBDw-");
//! assert_eq!(mailbox_name::decode("&BBIEMAQ2BD0EPgQ1-").unwrap(), "Важное");
//! ```

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::{Error, Result};

/// Shift character that starts an encoded run.
const SHIFT_IN: char = '&';

/// Shift character that ends an encoded run.
const SHIFT_OUT: char = '-';

/// Hierarchy separator in client-facing names.
const SEPARATOR: char = '/';

/// `+,` alphabet; padding is never written and optional when reading, and
/// stray bits in the last symbol are ignored.
const MUTF7: GeneralPurpose = GeneralPurpose::new(
    &alphabet::IMAP_MUTF7,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Encodes a mailbox name for the wire.
///
/// Each `/`-separated segment is encoded on its own, so an encoded run
/// never spans a hierarchy separator.
#[must_use]
pub fn encode(name: &str) -> String {
    name.split(SEPARATOR)
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut unsafe_run: Vec<u16> = Vec::new();

    for c in segment.chars() {
        if is_direct(c) {
            flush_run(&mut out, &mut unsafe_run);
            out.push(c);
            if c == SHIFT_IN {
                out.push(SHIFT_OUT);
            }
        } else {
            let mut units = [0u16; 2];
            unsafe_run.extend_from_slice(c.encode_utf16(&mut units));
        }
    }
    flush_run(&mut out, &mut unsafe_run);

    out
}

fn flush_run(out: &mut String, run: &mut Vec<u16>) {
    if run.is_empty() {
        return;
    }

    let bytes: Vec<u8> = run.iter().flat_map(|unit| unit.to_be_bytes()).collect();
    out.push(SHIFT_IN);
    MUTF7.encode_string(bytes, out);
    out.push(SHIFT_OUT);
    run.clear();
}

/// Printable US-ASCII, which travels unencoded.
const fn is_direct(c: char) -> bool {
    matches!(c, ' '..='~')
}

/// Decodes a wire mailbox name.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if an encoded run is not closed by `-`, is
/// not valid base64, or does not hold well-formed UTF-16BE.
pub fn decode(wire: &str) -> Result<String> {
    let mut segments = wire.split(SHIFT_IN);
    let mut out = String::with_capacity(wire.len());

    if let Some(first) = segments.next() {
        out.push_str(first);
    }

    for segment in segments {
        let (payload, suffix) = segment
            .split_once(SHIFT_OUT)
            .ok_or_else(|| Error::Encoding(format!("{wire}: unterminated shift sequence")))?;

        if payload.is_empty() {
            out.push(SHIFT_IN);
        } else {
            out.push_str(&decode_run(payload)?);
        }
        out.push_str(suffix);
    }

    Ok(out)
}

fn decode_run(payload: &str) -> Result<String> {
    let bytes = MUTF7
        .decode(payload)
        .map_err(|e| Error::Encoding(format!("{payload}: {e}")))?;

    if bytes.len() % 2 != 0 {
        return Err(Error::Encoding(format!(
            "{payload}: odd number of UTF-16 bytes"
        )));
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&units).map_err(|e| Error::Encoding(format!("{payload}: {e}")))
}
