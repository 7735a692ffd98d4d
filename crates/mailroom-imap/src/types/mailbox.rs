//! Mailbox types.

/// Mailbox name as the user sees it (decoded from modified UTF-7).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mailbox(pub String);

impl Mailbox {
    /// Creates a new mailbox name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the mailbox name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<&str> for Mailbox {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One line of a LIST reply.
///
/// The mailbox name is kept in its wire form; decode it with
/// [`mailbox_name::decode`](crate::mailbox_name::decode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse {
    /// Mailbox attributes.
    pub attributes: Vec<MailboxAttribute>,
    /// Hierarchy delimiter.
    pub delimiter: Option<char>,
    /// Wire-encoded mailbox name.
    pub name: String,
}

impl ListResponse {
    /// Parses a LIST line: `(attributes) "delimiter" name`.
    ///
    /// The attribute list and the delimiter may both be missing; a line
    /// holding only a name is accepted. The delimiter may be `NIL` and the
    /// name may be quoted (with `\"` and `\\` escapes) or a bare atom.
    ///
    /// Returns `None` if the line has no name or trailing garbage.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut rest = line.trim();
        let mut attributes = Vec::new();

        if let Some(after) = rest.strip_prefix('(') {
            let end = after.find(')')?;
            attributes = after[..end]
                .split_whitespace()
                .map(MailboxAttribute::parse)
                .collect();
            rest = after[end + 1..].trim_start();
        }

        let (first, rest) = next_token(rest)?;
        let rest = rest.trim_start();
        if rest.is_empty() {
            return Some(Self {
                attributes,
                delimiter: None,
                name: first.into_string(),
            });
        }

        let (second, rest) = next_token(rest)?;
        if !rest.trim().is_empty() {
            return None;
        }

        let delimiter = match first {
            Token::Atom(atom) if atom.eq_ignore_ascii_case("NIL") => None,
            token => token.into_string().chars().next(),
        };

        Some(Self {
            attributes,
            delimiter,
            name: second.into_string(),
        })
    }

    /// Returns `true` unless the mailbox is flagged `\Noselect` or
    /// `\NonExistent`.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self
            .attributes
            .iter()
            .any(|attr| matches!(attr, MailboxAttribute::NoSelect | MailboxAttribute::NonExistent))
    }
}

enum Token<'a> {
    Quoted(String),
    Atom(&'a str),
}

impl Token<'_> {
    fn into_string(self) -> String {
        match self {
            Self::Quoted(s) => s,
            Self::Atom(s) => s.to_string(),
        }
    }
}

/// Reads a quoted string or an atom from the start of `s`.
fn next_token(s: &str) -> Option<(Token<'_>, &str)> {
    let Some(quoted) = s.strip_prefix('"') else {
        let end = s.find(char::is_whitespace).unwrap_or(s.len());
        return (end > 0).then(|| (Token::Atom(&s[..end]), &s[end..]));
    };

    let mut value = String::new();
    let mut chars = quoted.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => value.push(chars.next()?.1),
            '"' => return Some((Token::Quoted(value), &quoted[i + 1..])),
            c => value.push(c),
        }
    }

    // Unterminated quoted string
    None
}

/// Mailbox attributes from LIST response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MailboxAttribute {
    /// Mailbox cannot be selected.
    NoSelect,
    /// Mailbox does not exist (RFC 9051; implies `\Noselect`).
    NonExistent,
    /// Mailbox has no children.
    HasNoChildren,
    /// Mailbox has children.
    HasChildren,
    /// Mailbox is marked for attention.
    Marked,
    /// Mailbox is not marked.
    Unmarked,
    // SPECIAL-USE mailbox attributes (RFC 6154)
    /// All messages (virtual mailbox).
    All,
    /// Mailbox is the archive folder.
    Archive,
    /// Mailbox is the drafts folder.
    Drafts,
    /// Flagged/starred messages (virtual mailbox).
    Flagged,
    /// Mailbox is the junk/spam folder.
    Junk,
    /// Mailbox is the sent folder.
    Sent,
    /// Mailbox is the trash folder.
    Trash,
    /// Unknown attribute.
    Unknown(String),
}

impl MailboxAttribute {
    /// Parses a mailbox attribute string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "\\NOSELECT" => Self::NoSelect,
            "\\NONEXISTENT" => Self::NonExistent,
            "\\HASNOCHILDREN" => Self::HasNoChildren,
            "\\HASCHILDREN" => Self::HasChildren,
            "\\MARKED" => Self::Marked,
            "\\UNMARKED" => Self::Unmarked,
            // RFC 6154 SPECIAL-USE
            "\\ALL" => Self::All,
            "\\ARCHIVE" => Self::Archive,
            "\\DRAFTS" => Self::Drafts,
            "\\FLAGGED" => Self::Flagged,
            "\\JUNK" | "\\SPAM" => Self::Junk,
            "\\SENT" => Self::Sent,
            "\\TRASH" => Self::Trash,
            _ => Self::Unknown(s.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod mailbox_tests {
        use super::*;

        #[test]
        fn display() {
            let mb = Mailbox::new("Sent");
            assert_eq!(format!("{mb}"), "Sent");
            assert_eq!(mb, "Sent");
        }
    }

    mod list_response_tests {
        use super::*;

        #[test]
        fn full_line() {
            let resp = ListResponse::parse(r#"(\HasNoChildren \Sent) "/" "Sent Items""#).unwrap();
            assert_eq!(
                resp.attributes,
                vec![MailboxAttribute::HasNoChildren, MailboxAttribute::Sent]
            );
            assert_eq!(resp.delimiter, Some('/'));
            assert_eq!(resp.name, "Sent Items");
            assert!(resp.is_selectable());
        }

        #[test]
        fn atom_name_and_nil_delimiter() {
            let resp = ListResponse::parse("() NIL INBOX").unwrap();
            assert!(resp.attributes.is_empty());
            assert_eq!(resp.delimiter, None);
            assert_eq!(resp.name, "INBOX");
        }

        #[test]
        fn name_only() {
            let resp = ListResponse::parse("\"2\"").unwrap();
            assert_eq!(resp.name, "2");
            assert_eq!(resp.delimiter, None);
        }

        #[test]
        fn attributes_glued_to_name() {
            let resp = ListResponse::parse("(\\noselect)\"1\"").unwrap();
            assert_eq!(resp.attributes, vec![MailboxAttribute::NoSelect]);
            assert_eq!(resp.name, "1");
            assert!(!resp.is_selectable());
        }

        #[test]
        fn escaped_quotes() {
            let resp = ListResponse::parse(r#"() "." "say \"hi\" \\ bye""#).unwrap();
            assert_eq!(resp.delimiter, Some('.'));
            assert_eq!(resp.name, r#"say "hi" \ bye"#);
        }

        #[test]
        fn encoded_name_kept_on_wire_form() {
            let resp = ListResponse::parse(r#"(\HasChildren) "/" "&BCEEPwQwBDw-""#).unwrap();
            assert_eq!(resp.name, "&BCEEPwQwBDw-");
        }

        #[test]
        fn nonexistent_is_not_selectable() {
            let resp = ListResponse::parse(r#"(\NonExistent) "/" "Gone""#).unwrap();
            assert!(!resp.is_selectable());
        }

        #[test]
        fn rejects_malformed() {
            assert!(ListResponse::parse("").is_none());
            assert!(ListResponse::parse("(\\HasChildren").is_none());
            assert!(ListResponse::parse("() \"/\" \"unterminated").is_none());
            assert!(ListResponse::parse("() \"/\" a b").is_none());
        }
    }

    mod mailbox_attribute_tests {
        use super::*;

        #[test]
        fn parse_noselect() {
            assert_eq!(
                MailboxAttribute::parse("\\NoSelect"),
                MailboxAttribute::NoSelect
            );
            assert_eq!(
                MailboxAttribute::parse("\\noselect"),
                MailboxAttribute::NoSelect
            );
        }

        #[test]
        fn parse_spam() {
            assert_eq!(MailboxAttribute::parse("\\Spam"), MailboxAttribute::Junk);
        }

        #[test]
        fn parse_unknown() {
            let attr = MailboxAttribute::parse("\\Custom");
            assert_eq!(attr, MailboxAttribute::Unknown("\\Custom".to_string()));
        }
    }
}
