//! Error and result types for client operations.
//!
//! Every failure surfaced by this crate falls into one of four kinds,
//! matching the phase of the connection lifecycle it occurred in:
//! connection establishment, schema reconciliation, reads, and writes.
//! Failures carry the original cause where one exists and are never
//! retried or downgraded by this layer.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed underlying cause attached to a [`ClientError`].
pub type ErrorSource = Box<dyn StdError + Send + Sync>;

/// Represents all failures a document store client can produce.
///
/// A `findOne` with no match or a `deleteOne` that removed nothing are
/// *not* errors; those outcomes are modeled as `None` / `false` results
/// on the corresponding client methods.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Opening the connection or verifying liveness failed (network,
    /// authentication, DNS, invalid parameters).
    #[error("connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: Option<ErrorSource>,
    },
    /// Creating a collection or index during reconciliation failed.
    /// Anything already created stays created; no rollback is attempted.
    #[error("schema reconciliation failed: {context}")]
    Schema {
        context: String,
        #[source]
        source: Option<ErrorSource>,
    },
    /// A read failed, including mid-stream while draining a cursor.
    #[error("query failed: {context}")]
    Query {
        context: String,
        #[source]
        source: Option<ErrorSource>,
    },
    /// An insert or delete failed, in whole or in part.
    #[error("write failed: {context}")]
    Write {
        context: String,
        #[source]
        source: Option<ErrorSource>,
    },
}

/// A specialized `Result` type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Creates a connection error wrapping an underlying cause.
    pub fn connection<E>(context: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a connection error with no underlying cause, for invalid
    /// connection parameters detected before any I/O happens.
    pub fn connection_config(context: impl Into<String>) -> Self {
        Self::Connection {
            context: context.into(),
            source: None,
        }
    }

    /// Creates a schema error wrapping an underlying cause.
    pub fn schema<E>(context: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Schema {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a schema error with no underlying cause, for descriptors
    /// rejected by validation.
    pub fn schema_config(context: impl Into<String>) -> Self {
        Self::Schema {
            context: context.into(),
            source: None,
        }
    }

    /// Creates a query error wrapping an underlying cause.
    pub fn query<E>(context: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Query {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a write error wrapping an underlying cause.
    pub fn write<E>(context: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Write {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a write error with no underlying cause.
    pub fn write_config(context: impl Into<String>) -> Self {
        Self::Write {
            context: context.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = ClientError::connection_config("username set without password");
        assert!(err.to_string().contains("username set without password"));
        assert!(err.to_string().starts_with("connection failed"));
    }

    #[test]
    fn source_is_preserved() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ClientError::connection("open failed", cause);

        let source = std::error::Error::source(&err).expect("source attached");
        assert!(source.to_string().contains("refused"));
    }
}
