//! Photo blob storage on an S3-compatible bucket with public-read URLs.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3 upload failed: {0}")]
    Upload(String),

    #[error("S3 delete failed: {0}")]
    Delete(String),

    #[error("URL is not served by this bucket: {0}")]
    ForeignUrl(String),
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `key` and returns its public URL.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, StorageError>;

    async fn delete_by_url(&self, url: &str) -> Result<(), StorageError>;
}

/// `resume_photos/{user_id}/{unix_millis}-{filename}` with the filename
/// reduced to URL-safe characters.
pub fn photo_key(user_id: &str, filename: &str, now: DateTime<Utc>) -> String {
    let safe: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let safe = safe.trim_matches('-');
    let safe = if safe.is_empty() { "photo" } else { safe };
    format!(
        "resume_photos/{}/{}-{}",
        user_id,
        now.timestamp_millis(),
        safe
    )
}

pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base: String,
}

impl S3BlobStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base: String) -> Self {
        Self {
            client,
            bucket,
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key)
    }

    pub fn key_for_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.public_base.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        info!("Uploaded photo to s3://{}/{}", self.bucket, key);
        Ok(self.public_url(key))
    }

    async fn delete_by_url(&self, url: &str) -> Result<(), StorageError> {
        let key = self
            .key_for_url(url)
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete(e.to_string()))?;

        info!("Deleted photo s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn store() -> S3BlobStore {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("us-east-1"))
            .build();
        S3BlobStore::new(
            aws_sdk_s3::Client::from_conf(config),
            "resumes".into(),
            "https://cdn.example.com/resumes/".into(),
        )
    }

    #[test]
    fn test_photo_key_layout() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            photo_key("user_2abc", "my photo (1).PNG", now),
            "resume_photos/user_2abc/1700000000123-my-photo--1-.PNG"
        );
        assert_eq!(
            photo_key("u", "???", now),
            "resume_photos/u/1700000000123-photo"
        );
    }

    #[test]
    fn test_url_key_round_trip() {
        let store = store();
        let url = store.public_url("resume_photos/u/1-a.png");
        assert_eq!(url, "https://cdn.example.com/resumes/resume_photos/u/1-a.png");
        assert_eq!(store.key_for_url(&url), Some("resume_photos/u/1-a.png"));
    }

    #[test]
    fn test_foreign_urls_have_no_key() {
        let store = store();
        assert_eq!(store.key_for_url("https://elsewhere.example.com/a.png"), None);
        assert_eq!(store.key_for_url("data:image/png;base64,AAAA"), None);
        assert_eq!(store.key_for_url("https://cdn.example.com/resumes/"), None);
    }
}
