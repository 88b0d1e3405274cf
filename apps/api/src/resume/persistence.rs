//! Save / delete / list / load for the authenticated caller.
//!
//! Blob writes and row writes are not atomic together. A failed save can
//! leave an orphaned upload; a failed best-effort delete leaves a stale blob.
//! Neither is surfaced to the caller.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::ListCache;
use crate::errors::AppError;
use crate::resume::mapping::{to_resume_values, to_snapshot, ResumeSnapshot};
use crate::resume::models::{PhotoState, ResumeValues};
use crate::resume::repository::{ResumeStore, ResumeWrite};
use crate::resume::validation::parse_resume;
use crate::storage::{photo_key, BlobStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<ResumeSnapshot>,
    pub total: usize,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Resume {id} not found"))
}

async fn delete_blob_best_effort(blobs: &dyn BlobStore, url: &str) {
    if let Err(e) = blobs.delete_by_url(url).await {
        warn!("Could not delete photo {url}: {e}");
    }
}

/// Validates, resolves the photo, writes the aggregate and returns it as stored.
pub async fn save_resume(
    store: &dyn ResumeStore,
    blobs: &dyn BlobStore,
    cache: &dyn ListCache,
    user_id: &str,
    values: ResumeValues,
) -> Result<ResumeSnapshot, AppError> {
    let values = parse_resume(values)?;

    let existing = match values.id {
        Some(id) => Some(
            store
                .find_owned(user_id, id)
                .await?
                .ok_or_else(|| not_found(id))?,
        ),
        None => None,
    };
    let stored_url = existing
        .as_ref()
        .and_then(|r| r.resume.photo_url.clone())
        .filter(|url| !url.is_empty());

    // (photo reference to write, blob to drop once the write lands)
    let (photo_url, stale_url) = match &values.photo {
        PhotoState::Upload(upload) => {
            let key = photo_key(user_id, &upload.filename, Utc::now());
            let url = blobs
                .put(&key, upload.bytes.clone(), &upload.content_type)
                .await?;
            (Some(url), stored_url)
        }
        PhotoState::Removed => (None, stored_url),
        PhotoState::Unset | PhotoState::Existing(_) => (stored_url, None),
    };

    let write = ResumeWrite {
        values: &values,
        photo_url: photo_url.as_deref(),
    };
    let record = match &existing {
        Some(current) => store.replace(user_id, current.resume.id, write).await?,
        None => store.insert(user_id, write).await?,
    };

    if let Some(url) = stale_url {
        delete_blob_best_effort(blobs, &url).await;
    }
    cache.invalidate(user_id).await;

    info!(
        resume_id = %record.resume.id,
        user_id,
        created = existing.is_none(),
        "Resume saved"
    );
    Ok(to_snapshot(&record))
}

pub async fn delete_resume(
    store: &dyn ResumeStore,
    blobs: &dyn BlobStore,
    cache: &dyn ListCache,
    user_id: &str,
    id: Uuid,
) -> Result<(), AppError> {
    let record = store
        .find_owned(user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(url) = record.resume.photo_url.as_deref().filter(|u| !u.is_empty()) {
        delete_blob_best_effort(blobs, url).await;
    }

    if !store.delete(user_id, id).await? {
        return Err(not_found(id));
    }
    cache.invalidate(user_id).await;

    info!(resume_id = %id, user_id, "Resume deleted");
    Ok(())
}

/// Cache-aside over the store. An unreadable cache entry counts as a miss.
pub async fn list_resumes(
    store: &dyn ResumeStore,
    cache: &dyn ListCache,
    user_id: &str,
) -> Result<ResumeListResponse, AppError> {
    if let Some(cached) = cache.get(user_id).await {
        match serde_json::from_str::<ResumeListResponse>(&cached) {
            Ok(list) => return Ok(list),
            Err(e) => warn!("Discarding unreadable resume list cache entry: {e}"),
        }
    }

    let resumes: Vec<ResumeSnapshot> = store
        .list_for_user(user_id)
        .await?
        .iter()
        .map(to_snapshot)
        .collect();
    let list = ResumeListResponse {
        total: resumes.len(),
        resumes,
    };

    match serde_json::to_string(&list) {
        Ok(payload) => cache.put(user_id, &payload).await,
        Err(e) => warn!("Could not serialize resume list for cache: {e}"),
    }
    debug!(user_id, total = list.total, "Resume list loaded from store");
    Ok(list)
}

pub async fn load_resume(
    store: &dyn ResumeStore,
    user_id: &str,
    id: Uuid,
) -> Result<ResumeValues, AppError> {
    let record = store
        .find_owned(user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(to_resume_values(&record))
}
