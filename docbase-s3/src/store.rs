//! Object storage over S3, scoped to a bucket and key prefix.
//!
//! [`BlobStore`] is a thin put/get/delete wrapper with no reconciliation
//! logic: every operation is one remote call against keys joined under the
//! configured prefix. Fetching a key that does not exist is an explicit
//! `Ok(None)`, never an error.

use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, error};

use crate::{
    config::BlobConfig,
    error::{BlobError, BlobResult},
};

/// A handle to one bucket + prefix scope.
///
/// Construction builds the SDK client from the supplied configuration —
/// including the optional shared-credentials profile — so ownership of the
/// client sits with whoever called [`BlobStore::new`]; there is no
/// process-wide client.
#[derive(Debug, Clone)]
pub struct BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl BlobStore {
    /// Builds a store from configuration, loading AWS credentials from
    /// the profile named in the config or the default provider chain.
    pub async fn new(config: BlobConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(profile) = &config.profile {
            debug!(tag = "blob.config", profile = %profile, "using credentials from shared profile");
            loader = loader.profile_name(profile);
        }

        let sdk_config = loader.load().await;

        Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
            bucket: config.bucket,
            prefix: normalize_prefix(&config.prefix),
        }
    }

    /// Wraps an existing SDK client; used when the caller manages client
    /// construction itself.
    pub fn with_client(client: aws_sdk_s3::Client, bucket: impl Into<String>, prefix: &str) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: normalize_prefix(prefix),
        }
    }

    /// Stores a byte payload under the prefixed key.
    ///
    /// # Errors
    ///
    /// Returns a [`BlobError::Put`] if the upload fails.
    pub async fn put(&self, data: Vec<u8>, path: &str, content_type: &str) -> BlobResult<()> {
        let key = join_key(&self.prefix, path);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|err| {
                error!(tag = "blob.put", key = %key, error = %err, "failed to store object");
                BlobError::Put {
                    key: key.clone(),
                    message: err.to_string(),
                }
            })?;

        debug!(tag = "blob.put", key = %key, "stored object");

        Ok(())
    }

    /// Fetches the payload stored under the prefixed key.
    ///
    /// Returns `Ok(None)` when the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`BlobError::Get`] for any failure other than a missing
    /// key, including a failure while draining the body.
    pub async fn get(&self, path: &str) -> BlobResult<Option<Vec<u8>>> {
        let key = join_key(&self.prefix, path);

        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                if err.as_service_error().is_some_and(|e| e.is_no_such_key()) {
                    debug!(tag = "blob.get", key = %key, "object not found");
                    return Ok(None);
                }

                error!(tag = "blob.get", key = %key, error = %err, "failed to fetch object");
                return Err(BlobError::Get {
                    key,
                    message: err.to_string(),
                });
            }
        };

        let bytes = output.body.collect().await.map_err(|err| {
            error!(tag = "blob.get", key = %key, error = %err, "failed to read object body");
            BlobError::Get {
                key: key.clone(),
                message: err.to_string(),
            }
        })?;

        Ok(Some(bytes.into_bytes().to_vec()))
    }

    /// Deletes the object stored under the prefixed key.
    ///
    /// Deleting a key that does not exist succeeds; the store treats
    /// deletion as idempotent.
    ///
    /// # Errors
    ///
    /// Returns a [`BlobError::Delete`] if the call fails.
    pub async fn delete(&self, path: &str) -> BlobResult<()> {
        let key = join_key(&self.prefix, path);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|err| {
                error!(tag = "blob.del", key = %key, error = %err, "failed to delete object");
                BlobError::Delete {
                    key: key.clone(),
                    message: err.to_string(),
                }
            })?;

        debug!(tag = "blob.del", key = %key, "deleted object");

        Ok(())
    }

    /// The bucket this store writes into.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The normalized key prefix, empty or `/`-terminated.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Trims the prefix and ensures a non-empty prefix ends with `/`.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim();
    if trimmed.is_empty() || trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

fn join_key(prefix: &str, path: &str) -> String {
    format!("{prefix}{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prefix_stays_empty() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("   "), "");
    }

    #[test]
    fn prefix_gains_trailing_slash() {
        assert_eq!(normalize_prefix("uploads"), "uploads/");
        assert_eq!(normalize_prefix("uploads/"), "uploads/");
        assert_eq!(normalize_prefix("  uploads  "), "uploads/");
    }

    #[test]
    fn keys_join_under_prefix() {
        assert_eq!(join_key("uploads/", "a/b.txt"), "uploads/a/b.txt");
        assert_eq!(join_key("", "a/b.txt"), "a/b.txt");
    }
}
