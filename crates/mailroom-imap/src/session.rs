//! Mailbox client session.
//!
//! `Session` tracks how far a connection has come (connected, logged in,
//! mailbox selected), refuses operations the current state does not allow,
//! and turns raw transport replies into mailbox names and [`Email`]s.
//!
//! ## Example
//!
//! ```ignore
//! use mailroom_imap::{ListOrder, Session};
//!
//! let mut session = Session::new(MyConnector::default());
//! session.connect("imap.example.com", 993)?;
//! session.login("user@example.com", "password")?;
//!
//! for mailbox in session.list_mailboxes()?.unwrap_or_default() {
//!     println!("{mailbox}");
//! }
//!
//! session.select_mailbox("INBOX")?;
//! for email in session.list_emails(ListOrder::NewestFirst)? {
//!     let email = email?;
//!     println!("{}: {}", email.id(), email.subject().unwrap_or_default());
//! }
//!
//! session.close()?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use mailroom_mime::build_text_message;

use crate::attachment::extract_attachments;
use crate::config::Config;
use crate::email::Email;
use crate::mailbox_name;
use crate::state::SessionState;
use crate::time::{BoxClock, Clock, SystemClock, internal_date};
use crate::transport::{Connection, Connector, FetchPart, Reply};
use crate::types::{ListResponse, Mailbox, SeqNum, parse_search_ids};
use crate::{Error, Result};

/// Search criteria for listing every message.
const SEARCH_ALL: &str = "ALL";

/// Fetch items for a whole message.
const FETCH_MESSAGE: &str = "(RFC822)";

/// Order in which [`Session::list_emails`] yields messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Highest sequence number first.
    #[default]
    NewestFirst,
    /// Lowest sequence number first.
    OldestFirst,
}

/// IMAP mailbox client session over a pluggable transport.
///
/// Operations check the session state before touching the transport:
///
/// | Operation | Needs | Error otherwise |
/// |---|---|---|
/// | [`login`](Self::login) | connected | [`Error::NotConnected`] |
/// | [`list_mailboxes`](Self::list_mailboxes), [`select_mailbox`](Self::select_mailbox), [`upload_email`](Self::upload_email) | authenticated | [`Error::NotAuthenticated`] |
/// | [`list_emails`](Self::list_emails), [`read_email`](Self::read_email), [`download_attachments`](Self::download_attachments) | mailbox selected | [`Error::NoMailboxSelected`] |
///
/// A server refusing a command is not an error: it shows up as `None`, an
/// empty result, or the returned [`Reply`].
///
/// A session is single-threaded; each call blocks until its transport call
/// returns.
pub struct Session<C: Connector> {
    connector: C,
    config: Config,
    clock: BoxClock,
    state: SessionState,
    /// Login name of the authenticated user; the password is never kept.
    login: Option<String>,
    connection: Option<C::Connection>,
}

impl<C: Connector> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("login", &self.login)
            .field("connected", &self.connection.is_some())
            .finish_non_exhaustive()
    }
}

impl<C: Connector> Session<C> {
    /// Creates a disconnected session with the default configuration.
    #[must_use]
    pub fn new(connector: C) -> Self {
        Self::with_config(connector, Config::default())
    }

    /// Creates a disconnected session.
    ///
    /// `config` supplies the security mode, timeout and upload mailbox used
    /// by [`connect`](Self::connect).
    #[must_use]
    pub fn with_config(connector: C, config: Config) -> Self {
        Self {
            connector,
            config,
            clock: Box::new(SystemClock),
            state: SessionState::Disconnected,
            login: None,
            connection: None,
        }
    }

    /// Replaces the clock used to date uploaded messages.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns `true` if a connection is open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Returns `true` if logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// Returns the currently selected mailbox, if any.
    #[must_use]
    pub fn selected_mailbox(&self) -> Option<&str> {
        self.state.selected_mailbox()
    }

    /// Returns the login name of the authenticated user.
    #[must_use]
    pub fn login_name(&self) -> Option<&str> {
        self.login.as_deref()
    }

    /// Returns the configuration of the current (or next) connection.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Connects to `server:port`, keeping the configured security mode,
    /// timeout and upload mailbox.
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the connection cannot be opened.
    pub fn connect(&mut self, server: &str, port: u16) -> Result<()> {
        let config = Config {
            host: server.to_string(),
            port,
            ..self.config.clone()
        };
        self.connect_with(&config)
    }

    /// Connects using a full configuration.
    ///
    /// An open connection is closed first.
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the connection cannot be opened.
    pub fn connect_with(&mut self, config: &Config) -> Result<()> {
        if self.connection.is_some()
            && let Err(e) = self.close()
        {
            tracing::warn!(error = %e, "Logout of previous connection failed");
        }

        self.config = config.clone();
        tracing::debug!(host = %config.host, port = config.port, security = ?config.security, "Connecting");
        let connection = self.connector.connect(&self.config)?;

        self.connection = Some(connection);
        self.state = SessionState::Connected;
        tracing::info!(host = %config.host, port = config.port, "Connected");
        Ok(())
    }

    /// Logs in.
    ///
    /// The session becomes authenticated only if the server answers OK;
    /// otherwise the state is unchanged and the reply says why.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] without a connection, or the
    /// transport's error.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Reply> {
        let connection = self.connection.as_mut().ok_or(Error::NotConnected)?;

        tracing::debug!(username, "LOGIN");
        let reply = connection.login(username, password)?;

        if reply.is_ok() {
            self.login = Some(username.to_string());
            self.state = SessionState::Authenticated;
            tracing::info!(username, "Authenticated");
        } else {
            tracing::warn!(username, status = %reply.status, "Login refused");
        }

        Ok(reply)
    }

    /// Lists the selectable mailboxes, decoded from modified UTF-7.
    ///
    /// Returns `None` if the server refuses the listing. Mailboxes flagged
    /// `\Noselect` are left out, as are lines that cannot be parsed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] before login,
    /// [`Error::Encoding`] for a malformed mailbox name, or the transport's
    /// error.
    pub fn list_mailboxes(&mut self) -> Result<Option<Vec<Mailbox>>> {
        let connection = self.authenticated()?;

        tracing::debug!("LIST");
        let reply = connection.list()?;
        if !reply.is_ok() {
            tracing::warn!(status = %reply.status, "Mailbox listing refused");
            return Ok(None);
        }

        let mut mailboxes = Vec::new();
        for line in &reply.data {
            let line = String::from_utf8_lossy(line);
            let Some(entry) = ListResponse::parse(&line) else {
                tracing::warn!(%line, "Skipping unparsable LIST line");
                continue;
            };
            if entry.is_selectable() {
                mailboxes.push(Mailbox::new(mailbox_name::decode(&entry.name)?));
            }
        }

        Ok(Some(mailboxes))
    }

    /// Selects a mailbox.
    ///
    /// Each call decides the selection afresh: an OK reply selects `name`,
    /// anything else leaves the session authenticated with no mailbox
    /// selected, even if one was selected before. The reply is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] before login, or the transport's
    /// error.
    pub fn select_mailbox(&mut self, name: &str) -> Result<Reply> {
        let connection = self.authenticated()?;

        let wire_name = mailbox_name::encode(name);
        tracing::debug!(mailbox = name, wire_name = %wire_name, "SELECT");
        let reply = connection.select(&wire_name)?;

        if reply.is_ok() {
            self.state = SessionState::Selected {
                mailbox: name.to_string(),
            };
            tracing::info!(mailbox = name, "Mailbox selected");
        } else {
            self.state = SessionState::Authenticated;
            tracing::warn!(mailbox = name, status = %reply.status, "Select refused");
        }

        Ok(reply)
    }

    /// Lists the messages of the selected mailbox.
    ///
    /// The message ids come from a single search made now; the returned
    /// iterator fetches each message as it is advanced. It is single-pass
    /// and does not notice later changes to the mailbox. Call again for a
    /// fresh listing.
    ///
    /// A refused search yields an empty iterator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMailboxSelected`] without a selected mailbox, or
    /// the transport's error.
    pub fn list_emails(&mut self, order: ListOrder) -> Result<Emails<'_, C>> {
        let connection = self.selected()?;

        tracing::debug!(criteria = SEARCH_ALL, "SEARCH");
        let reply = connection.search(SEARCH_ALL)?;

        let mut ids = if reply.is_ok() {
            parse_search_ids(&reply.data)
        } else {
            tracing::warn!(status = %reply.status, "Search refused");
            Vec::new()
        };
        if order == ListOrder::NewestFirst {
            ids.reverse();
        }

        Ok(Emails {
            session: self,
            ids: ids.into_iter(),
        })
    }

    /// Fetches and decodes one message.
    ///
    /// Returns `None` if the server refuses the fetch or sends no message
    /// data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMailboxSelected`] without a selected mailbox, or
    /// the transport's error.
    pub fn read_email(&mut self, id: SeqNum) -> Result<Option<Email>> {
        Ok(self
            .fetch_message(id)?
            .map(|raw| Email::from_bytes(id, &raw)))
    }

    /// Saves the attachments of one message into `dir`.
    ///
    /// Does nothing if the server refuses the fetch. Returns the paths
    /// written; see [`extract_attachments`] for how files are named.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMailboxSelected`] without a selected mailbox, the
    /// transport's error, or the first I/O error while writing.
    pub fn download_attachments(
        &mut self,
        id: SeqNum,
        dir: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>> {
        match self.fetch_message(id)? {
            Some(raw) => extract_attachments(&raw, dir.as_ref()),
            None => Ok(Vec::new()),
        }
    }

    /// Uploads a plain-text message to the configured upload mailbox.
    ///
    /// The logged-in user is the sender and the current time is the
    /// message's internal date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] before login, or the transport's
    /// error.
    pub fn upload_email(&mut self, subject: &str, body: &str, recipient: &str) -> Result<Reply> {
        let sender = self.login_name().unwrap_or_default().to_string();
        let mailbox = mailbox_name::encode(&self.config.upload_mailbox);
        let date = internal_date(self.clock.now());
        let connection = self.authenticated()?;

        let message = build_text_message(&sender, subject, body, recipient);
        tracing::debug!(mailbox = %mailbox, date = %date, size = message.len(), "APPEND");
        let reply = connection.append(&mailbox, "", &date, &message)?;

        if !reply.is_ok() {
            tracing::warn!(mailbox = %mailbox, status = %reply.status, "Upload refused");
        }
        Ok(reply)
    }

    /// Closes the session.
    ///
    /// Every session field returns to its initial value. If a connection
    /// was open, the server is sent LOGOUT and its reply returned; on an
    /// already closed session this does nothing and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns the transport's error from LOGOUT. The session is closed
    /// either way.
    pub fn close(&mut self) -> Result<Option<Reply>> {
        self.state = SessionState::Disconnected;
        self.login = None;

        let Some(mut connection) = self.connection.take() else {
            return Ok(None);
        };

        tracing::debug!("LOGOUT");
        let reply = connection.logout()?;
        tracing::info!(status = %reply.status, "Connection closed");
        Ok(Some(reply))
    }

    fn authenticated(&mut self) -> Result<&mut C::Connection> {
        if !self.state.is_authenticated() {
            return Err(Error::NotAuthenticated);
        }
        self.connection.as_mut().ok_or(Error::NotConnected)
    }

    fn selected(&mut self) -> Result<&mut C::Connection> {
        if !self.state.is_selected() {
            return Err(Error::NoMailboxSelected);
        }
        self.connection.as_mut().ok_or(Error::NotConnected)
    }

    fn fetch_message(&mut self, id: SeqNum) -> Result<Option<Vec<u8>>> {
        let connection = self.selected()?;

        tracing::debug!(%id, items = FETCH_MESSAGE, "FETCH");
        let reply = connection.fetch(id, FETCH_MESSAGE)?;
        if !reply.is_ok() {
            tracing::warn!(%id, status = %reply.status, "Fetch refused");
            return Ok(None);
        }

        let data = reply.data.iter().find_map(FetchPart::as_data).map(<[u8]>::to_vec);
        if data.is_none() {
            tracing::warn!(%id, "Fetch reply carried no message data");
        }
        Ok(data)
    }
}

/// Messages of one mailbox listing; see [`Session::list_emails`].
///
/// Ids whose fetch is refused are skipped. A transport error is yielded
/// once and the iteration can go on with the next id.
pub struct Emails<'a, C: Connector> {
    session: &'a mut Session<C>,
    ids: std::vec::IntoIter<SeqNum>,
}

impl<C: Connector> Emails<'_, C> {
    /// Number of ids not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.ids.len()
    }
}

impl<C: Connector> fmt::Debug for Emails<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emails")
            .field("remaining", &self.ids.as_slice())
            .finish_non_exhaustive()
    }
}

impl<C: Connector> Iterator for Emails<'_, C> {
    type Item = Result<Email>;

    fn next(&mut self) -> Option<Self::Item> {
        for id in self.ids.by_ref() {
            match self.session.read_email(id) {
                Ok(Some(email)) => return Some(Ok(email)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.ids.len()))
    }
}
