//! Mock metadata resolver for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::matching::{MediaKind, ShowDescriptor};
use crate::metadata::{MediaId, MetadataError, MetadataResolver};

/// Mock implementation of the MetadataResolver trait.
///
/// Descriptors are keyed by the id's display form (`tt123:1:2`,
/// `tmdb:42`); unknown ids resolve to `None`.
#[derive(Debug, Clone, Default)]
pub struct MockMetadataResolver {
    descriptors: Arc<RwLock<HashMap<String, ShowDescriptor>>>,
    fail: Arc<RwLock<bool>>,
    requests: Arc<RwLock<Vec<(MediaKind, String)>>>,
}

impl MockMetadataResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the descriptor returned for an id.
    pub async fn set_descriptor(&self, id: &str, descriptor: ShowDescriptor) {
        self.descriptors
            .write()
            .await
            .insert(id.to_string(), descriptor);
    }

    /// Make every lookup fail.
    pub async fn set_failing(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Lookups made so far.
    pub async fn recorded_requests(&self) -> Vec<(MediaKind, String)> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl MetadataResolver for MockMetadataResolver {
    fn name(&self) -> &str {
        "mock"
    }

    async fn describe(
        &self,
        kind: MediaKind,
        id: &MediaId,
    ) -> Result<Option<ShowDescriptor>, MetadataError> {
        let key = id.to_string();
        self.requests.write().await.push((kind, key.clone()));
        if *self.fail.read().await {
            return Err(MetadataError::Api {
                status: 500,
                message: "mock failure".to_string(),
            });
        }
        Ok(self
            .descriptors
            .read()
            .await
            .get(&key)
            .filter(|d| d.kind == kind)
            .cloned())
    }
}
