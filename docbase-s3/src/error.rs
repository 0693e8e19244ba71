//! Error types for object storage operations.

use thiserror::Error;

/// Failures from the object store.
///
/// A `get` for a missing key is *not* an error; it returns `Ok(None)`.
#[derive(Error, Debug)]
pub enum BlobError {
    /// Storing an object failed.
    #[error("failed to store object '{key}': {message}")]
    Put { key: String, message: String },
    /// Fetching an object failed for a reason other than a missing key.
    #[error("failed to fetch object '{key}': {message}")]
    Get { key: String, message: String },
    /// Deleting an object failed.
    #[error("failed to delete object '{key}': {message}")]
    Delete { key: String, message: String },
}

/// A specialized `Result` type for object storage operations.
pub type BlobResult<T> = Result<T, BlobError>;
