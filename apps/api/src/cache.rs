//! Per-user cache of the resume list view. Every operation is best-effort:
//! failures are logged and treated as a miss.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, warn};

#[async_trait]
pub trait ListCache: Send + Sync {
    async fn get(&self, user_id: &str) -> Option<String>;
    async fn put(&self, user_id: &str, payload: &str);
    async fn invalidate(&self, user_id: &str);
}

pub fn list_key(user_id: &str) -> String {
    format!("resumes:list:{user_id}")
}

pub struct RedisListCache {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisListCache {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    async fn connection(&self) -> Option<redis::aio::MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                warn!("Redis connection error: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl ListCache for RedisListCache {
    async fn get(&self, user_id: &str) -> Option<String> {
        let mut conn = self.connection().await?;
        match conn.get::<_, Option<String>>(list_key(user_id)).await {
            Ok(hit) => {
                debug!(user_id, hit = hit.is_some(), "Resume list cache lookup");
                hit
            }
            Err(e) => {
                warn!("Resume list cache read failed: {e}");
                None
            }
        }
    }

    async fn put(&self, user_id: &str, payload: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        if let Err(e) = conn
            .set_ex::<_, _, ()>(list_key(user_id), payload, self.ttl_secs)
            .await
        {
            warn!("Resume list cache write failed: {e}");
        }
    }

    async fn invalidate(&self, user_id: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        if let Err(e) = conn.del::<_, ()>(list_key(user_id)).await {
            warn!("Resume list cache invalidation failed: {e}");
        }
    }
}
