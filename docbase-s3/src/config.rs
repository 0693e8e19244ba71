//! Object storage configuration.

/// Bucket, key prefix, and optional credentials profile for a
/// [`BlobStore`](crate::store::BlobStore).
///
/// The original deployment picked the profile up from `AWS_PROFILE_NAME`
/// at module load; [`BlobConfig::from_env`] reproduces that while keeping
/// construction explicit.
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Target bucket name.
    pub bucket: String,
    /// Key prefix all operations are scoped under; normalized to end in
    /// `/` when non-empty.
    pub prefix: String,
    /// Optional shared-credentials profile name; `None` uses the default
    /// provider chain.
    pub profile: Option<String>,
}

impl BlobConfig {
    /// Creates a config using the default credentials provider chain.
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            profile: None,
        }
    }

    /// Selects a named shared-credentials profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Creates a config, picking the credentials profile from
    /// `AWS_PROFILE_NAME` when that variable is set.
    pub fn from_env(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            profile: std::env::var("AWS_PROFILE_NAME").ok(),
        }
    }
}
