//! Session state types.
//!
//! A session climbs these states one at a time and only `close()` takes it
//! back to the start. Each operation needs a minimum state; see
//! [`Session`](crate::Session).

use std::fmt;

/// Where a session stands.
///
/// - `Disconnected`: Initial state, no transport connection
/// - `Connected`: Connection open, waiting for credentials
/// - `Authenticated`: Logged in, mailboxes can be listed and selected
/// - `Selected`: A mailbox is open, its messages can be read
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionState {
    /// No connection.
    #[default]
    Disconnected,

    /// Connected, not yet logged in.
    Connected,

    /// Logged in, no mailbox selected.
    Authenticated,

    /// A mailbox is currently open.
    Selected {
        /// Name of the selected mailbox, as the caller gave it.
        mailbox: String,
    },
}

impl SessionState {
    /// Returns `true` if a connection is open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        !matches!(self, Self::Disconnected)
    }

    /// Returns `true` if we're authenticated (authenticated or selected).
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated | Self::Selected { .. })
    }

    /// Returns `true` if a mailbox is selected.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        matches!(self, Self::Selected { .. })
    }

    /// Returns the selected mailbox name, if any.
    #[must_use]
    pub fn selected_mailbox(&self) -> Option<&str> {
        match self {
            Self::Selected { mailbox } => Some(mailbox),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connected => write!(f, "connected"),
            Self::Authenticated => write!(f, "authenticated"),
            Self::Selected { mailbox } => write!(f, "selected {mailbox}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(mailbox: &str) -> SessionState {
        SessionState::Selected {
            mailbox: mailbox.to_string(),
        }
    }

    #[test]
    fn test_session_state_default() {
        assert_eq!(SessionState::default(), SessionState::Disconnected);
    }

    #[test]
    fn test_is_connected() {
        assert!(!SessionState::Disconnected.is_connected());
        assert!(SessionState::Connected.is_connected());
        assert!(selected("INBOX").is_connected());
    }

    #[test]
    fn test_is_authenticated() {
        assert!(!SessionState::Connected.is_authenticated());
        assert!(SessionState::Authenticated.is_authenticated());
        assert!(selected("INBOX").is_authenticated());
    }

    #[test]
    fn test_is_selected() {
        assert!(!SessionState::Authenticated.is_selected());
        assert!(selected("INBOX").is_selected());
    }

    #[test]
    fn test_selected_mailbox() {
        assert_eq!(SessionState::Connected.selected_mailbox(), None);
        assert_eq!(selected("Drafts").selected_mailbox(), Some("Drafts"));
        assert_eq!(selected("Drafts").to_string(), "selected Drafts");
    }
}
