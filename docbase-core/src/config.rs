//! Connection parameters for reaching a document store.
//!
//! [`ConnectionParams`] is a plain, caller-supplied description of the
//! target server. It carries no driver state; backend crates turn it into
//! their native connection options. Credentials are optional and are never
//! included when the parameters are displayed or logged.

use std::fmt;

use crate::error::{ClientError, ClientResult};

/// Parameters describing one database connection target.
///
/// If `username` is present and non-blank, `password` must be supplied as
/// well; absence of a username means an unauthenticated connection.
/// [`ConnectionParams::validate`] enforces that invariant.
///
/// # Example
///
/// ```ignore
/// use docbase_core::config::ConnectionParams;
///
/// let params = ConnectionParams::new("localhost", 27017, "appdata")
///     .with_credentials("svc_app", "hunter2");
/// assert_eq!(params.to_string(), "localhost:27017/appdata");
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    /// Server hostname or IP address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Optional username; blank is treated the same as absent.
    pub username: Option<String>,
    /// Password, required whenever a non-blank username is given.
    pub password: Option<String>,
    /// Name of the database the returned handle will be bound to.
    pub database: String,
}

impl ConnectionParams {
    /// Creates unauthenticated parameters for the given target.
    pub fn new(host: impl Into<String>, port: u16, database: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
            database: database.into(),
        }
    }

    /// Attaches a username and password.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Returns true if a non-blank username is present.
    pub fn has_credentials(&self) -> bool {
        self.username
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty())
    }

    /// Checks the credential invariant and basic target sanity.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError::Connection`] if the host or database name
    /// is empty, or if a non-blank username comes without a password.
    pub fn validate(&self) -> ClientResult<()> {
        if self.host.trim().is_empty() {
            return Err(ClientError::connection_config("host must not be empty"));
        }
        if self.database.trim().is_empty() {
            return Err(ClientError::connection_config(
                "database name must not be empty",
            ));
        }
        if self.has_credentials() && self.password.is_none() {
            return Err(ClientError::connection_config(
                "username supplied without a password",
            ));
        }

        Ok(())
    }
}

/// Renders `host:port/database` only. Credentials never appear in the
/// rendered form, so this is safe to log.
impl fmt::Display for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.database)
    }
}
