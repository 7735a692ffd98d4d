//! Command completion status.

use std::fmt;

/// Status a transport reports for a completed command.
///
/// Only [`Status::Ok`] counts as success; anything else is a refusal the
/// caller may inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// Command completed successfully.
    Ok,
    /// Command failed (operational error).
    No,
    /// Command failed (protocol/syntax error).
    Bad,
    /// Any other status text, kept verbatim.
    Other(String),
}

impl Status {
    /// Parses a status word, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let word = s.trim();
        if word.eq_ignore_ascii_case("OK") {
            Self::Ok
        } else if word.eq_ignore_ascii_case("NO") {
            Self::No
        } else if word.eq_ignore_ascii_case("BAD") {
            Self::Bad
        } else {
            Self::Other(word.to_string())
        }
    }

    /// Returns true if this is a successful status.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::No => write!(f, "NO"),
            Self::Bad => write!(f, "BAD"),
            Self::Other(word) => write!(f, "{word}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Status::parse("OK"), Status::Ok);
        assert_eq!(Status::parse("ok"), Status::Ok);
        assert_eq!(Status::parse(" Ok "), Status::Ok);
        assert_eq!(Status::parse("no"), Status::No);
        assert_eq!(Status::parse("BAD"), Status::Bad);
        assert_eq!(Status::parse("BYE"), Status::Other("BYE".to_string()));
    }

    #[test]
    fn test_is_ok() {
        assert!(Status::Ok.is_ok());
        assert!(!Status::No.is_ok());
        assert!(!Status::parse("OKAY").is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(Status::Ok.to_string(), "OK");
        assert_eq!(Status::Other("BYE".into()).to_string(), "BYE");
    }
}
