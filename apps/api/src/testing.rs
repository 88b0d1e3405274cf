//! In-memory stand-ins for the store, blob, cache and completion seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

use crate::auth::Claims;
use crate::cache::ListCache;
use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::{CompletionClient, LlmError};
use crate::models::resume::{ChildRows, ResumeRecord, ResumeRow};
use crate::resume::repository::{ResumeStore, ResumeWrite};
use crate::state::AppState;
use crate::storage::{BlobStore, StorageError};

pub const TEST_JWT_SECRET: &str = "test-secret";

pub fn token_for(secret: &str, sub: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<Uuid, ResumeRecord>>,
    clock: AtomicUsize,
    writes: AtomicUsize,
    reads: AtomicUsize,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Strictly increasing timestamps so ordering by `updated_at` is stable.
    fn tick(&self) -> DateTime<Utc> {
        let n = self.clock.fetch_add(1, Ordering::SeqCst) as i64;
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(n)
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn find_owned(&self, user_id: &str, id: Uuid) -> Result<Option<ResumeRecord>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .get(&id)
            .filter(|r| r.resume.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ResumeRecord>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        let mut owned: Vec<ResumeRecord> = rows
            .values()
            .filter(|r| r.resume.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.resume.updated_at.cmp(&a.resume.updated_at));
        Ok(owned)
    }

    async fn insert(&self, user_id: &str, write: ResumeWrite<'_>) -> Result<ResumeRecord, AppError> {
        let id = Uuid::new_v4();
        let record = ResumeRecord {
            resume: ResumeRow::from_values(id, user_id, write.values, write.photo_url, self.tick()),
            children: ChildRows::from_values(id, write.values),
        };
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().insert(id, record.clone());
        Ok(record)
    }

    async fn replace(
        &self,
        user_id: &str,
        id: Uuid,
        write: ResumeWrite<'_>,
    ) -> Result<ResumeRecord, AppError> {
        let now = self.tick();
        let mut rows = self.rows.lock().unwrap();
        let current = rows
            .get_mut(&id)
            .filter(|r| r.resume.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

        let mut resume = ResumeRow::from_values(id, user_id, write.values, write.photo_url, now);
        resume.created_at = current.resume.created_at;
        *current = ResumeRecord {
            resume,
            children: ChildRows::from_values(id, write.values),
        };
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(current.clone())
    }

    async fn delete(&self, user_id: &str, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let owned = rows.get(&id).is_some_and(|r| r.resume.user_id == user_id);
        if owned {
            rows.remove(&id);
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(owned)
    }
}

const BLOB_BASE: &str = "https://blobs.test";

#[derive(Default)]
pub struct MemoryBlobs {
    objects: Mutex<HashMap<String, (Bytes, String)>>,
    deleted: Mutex<Vec<String>>,
    fail_deletes: bool,
}

impl MemoryBlobs {
    pub fn failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Default::default()
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// URLs successfully deleted, in order.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobs {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, StorageError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (bytes, content_type.to_string()));
        Ok(format!("{BLOB_BASE}/{key}"))
    }

    async fn delete_by_url(&self, url: &str) -> Result<(), StorageError> {
        if self.fail_deletes {
            return Err(StorageError::Delete("simulated outage".into()));
        }
        let key = url
            .strip_prefix(BLOB_BASE)
            .and_then(|k| k.strip_prefix('/'))
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;
        self.objects.lock().unwrap().remove(key);
        self.deleted.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn contains(&self, user_id: &str) -> bool {
        self.entries.lock().unwrap().contains_key(user_id)
    }
}

#[async_trait]
impl ListCache for MemoryCache {
    async fn get(&self, user_id: &str) -> Option<String> {
        self.entries.lock().unwrap().get(user_id).cloned()
    }

    async fn put(&self, user_id: &str, payload: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(user_id.to_string(), payload.to_string());
    }

    async fn invalidate(&self, user_id: &str) {
        self.entries.lock().unwrap().remove(user_id);
    }
}

/// Replies with a fixed completion, or fails as an unavailable upstream.
pub struct ScriptedCompletion {
    reply: Option<String>,
    calls: Mutex<Vec<(String, String, u32)>>,
}

impl ScriptedCompletion {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(system, user, max_tokens)` per call.
    pub fn calls(&self) -> Vec<(String, String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string(), max_tokens));
        self.reply.clone().ok_or(LlmError::Api {
            status: 503,
            message: "service unavailable".into(),
        })
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/test".into(),
        redis_url: "redis://localhost".into(),
        s3_bucket: "resumes".into(),
        s3_endpoint: "http://localhost:9000".into(),
        s3_region: "us-east-1".into(),
        s3_public_url: BLOB_BASE.into(),
        aws_access_key_id: "test".into(),
        aws_secret_access_key: "test".into(),
        completion_api_url: "http://localhost/v1/chat/completions".into(),
        completion_api_key: "test".into(),
        auth_jwt_secret: TEST_JWT_SECRET.into(),
        list_cache_ttl_secs: 60,
        port: 0,
        rust_log: "debug".into(),
    }
}

/// State wired entirely to fakes.
pub fn test_state(completion: ScriptedCompletion) -> AppState {
    AppState {
        store: Arc::new(MemoryStore::default()),
        blobs: Arc::new(MemoryBlobs::default()),
        cache: Arc::new(MemoryCache::default()),
        completion: Arc::new(completion),
        config: test_config(),
    }
}
