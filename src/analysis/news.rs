//! Two-tier news search: a credentialed article API first, the public feed
//! when that yields nothing.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::clients::NewsProvider;
use crate::types::NewsSource;

pub const MAX_SOURCES: usize = 5;

#[derive(Clone)]
pub struct NewsLookup {
    primary: Option<Arc<dyn NewsProvider>>,
    fallback: Arc<dyn NewsProvider>,
}

impl NewsLookup {
    pub fn new(primary: Option<Arc<dyn NewsProvider>>, fallback: Arc<dyn NewsProvider>) -> Self {
        Self { primary, fallback }
    }

    /// Returns between 0 and `MAX_SOURCES` sources. Provider failures are
    /// logged and count as an empty result.
    pub async fn search_news(&self, query: &str) -> Vec<NewsSource> {
        let mut sources = match &self.primary {
            Some(primary) => search_provider(primary.as_ref(), query).await,
            None => Vec::new(),
        };

        if sources.is_empty() {
            sources = search_provider(self.fallback.as_ref(), query).await;
        }

        sources.truncate(MAX_SOURCES);
        sources
    }
}

async fn search_provider(provider: &dyn NewsProvider, query: &str) -> Vec<NewsSource> {
    match provider.search(query).await {
        Ok(sources) => {
            debug!(
                provider = provider.provider_name(),
                count = sources.len(),
                "News search returned"
            );
            sources
        }
        Err(e) => {
            warn!("{} search failed: {}", provider.provider_name(), e);
            Vec::new()
        }
    }
}
