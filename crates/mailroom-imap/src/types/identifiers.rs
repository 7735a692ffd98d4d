//! Message identifiers.

use std::fmt;
use std::str::FromStr;

/// Message sequence number.
///
/// Sequence numbers are assigned by the server to the messages of the
/// selected mailbox. They are ephemeral and change when messages are
/// expunged, so they mean nothing outside the session that received them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeqNum(pub u32);

impl SeqNum {
    /// Creates a new sequence number.
    #[must_use]
    pub const fn new(n: u32) -> Self {
        Self(n)
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for SeqNum {
    fn from(n: u32) -> Self {
        Self(n)
    }
}

impl FromStr for SeqNum {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses the sequence numbers out of SEARCH reply lines.
///
/// Every whitespace-separated token is read as a number; tokens that are
/// not are skipped with a warning.
#[must_use]
pub fn parse_search_ids(lines: &[Vec<u8>]) -> Vec<SeqNum> {
    lines
        .iter()
        .flat_map(|line| {
            String::from_utf8_lossy(line)
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter_map(|token| match token.parse() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(token = %token, error = %e, "Skipping unparsable message id");
                None
            }
        })
        .collect()
}
