use std::sync::Arc;

use sharestream_core::{
    Config, FileProvider, MetadataResolver, SanitizedConfig, StreamSearcher,
};

/// Shared application state
pub struct AppState {
    config: Config,
    provider: Arc<dyn FileProvider>,
    searcher: StreamSearcher,
    metadata: Option<Arc<dyn MetadataResolver>>,
}

impl AppState {
    pub fn new(
        config: Config,
        provider: Arc<dyn FileProvider>,
        metadata: Option<Arc<dyn MetadataResolver>>,
    ) -> Self {
        let searcher = StreamSearcher::new(Arc::clone(&provider), &config);
        Self {
            config,
            provider,
            searcher,
            metadata,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn provider(&self) -> &dyn FileProvider {
        self.provider.as_ref()
    }

    pub fn searcher(&self) -> &StreamSearcher {
        &self.searcher
    }

    /// Metadata resolver, if configured.
    pub fn metadata(&self) -> Option<&Arc<dyn MetadataResolver>> {
        self.metadata.as_ref()
    }
}
