use std::sync::Arc;

use crate::cache::ListCache;
use crate::config::Config;
use crate::llm_client::CompletionClient;
use crate::resume::repository::ResumeStore;
use crate::storage::BlobStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// External systems sit behind trait objects so handlers can run against fakes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResumeStore>,
    pub blobs: Arc<dyn BlobStore>,
    /// Resume list cache (Redis in production).
    pub cache: Arc<dyn ListCache>,
    pub completion: Arc<dyn CompletionClient>,
    pub config: Config,
}
