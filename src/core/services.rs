//! Collaborators driven by the boot sequence
//!
//! The storage client, indexer and searcher live outside this crate.
//! The sequencer only decides when they are invoked and with which
//! slice of the configuration.

use crate::core::config::{EsConfig, IndexerSettings, SearcherSettings};
use crate::core::error::ServiceError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Result type for collaborator calls
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Storage engine client and schema management
#[async_trait]
pub trait Store: Send + Sync {
    /// Connect the client and run schema upgrades
    async fn initialize(&self, cancel: &CancellationToken, es: &EsConfig) -> ServiceResult<()>;

    /// Import preset configuration and run autodiscovery
    async fn provision(&self, _cancel: &CancellationToken) -> ServiceResult<()> {
        Ok(())
    }
}

/// Content indexing engine
#[async_trait]
pub trait Indexer: Send + Sync {
    async fn initialize(
        &self,
        cancel: &CancellationToken,
        settings: IndexerSettings,
    ) -> ServiceResult<()>;

    /// Start background watchers; called once, at activation
    async fn start_watchers(&self, cancel: &CancellationToken) -> ServiceResult<()>;
}

/// Query serving engine
#[async_trait]
pub trait Searcher: Send + Sync {
    async fn initialize(
        &self,
        cancel: &CancellationToken,
        settings: SearcherSettings,
    ) -> ServiceResult<()>;
}

/// Collaborators container
///
/// Cloning shares the same instances.
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn Store>,
    pub indexer: Arc<dyn Indexer>,
    pub searcher: Arc<dyn Searcher>,
}

impl Collaborators {
    pub fn new(
        store: Arc<dyn Store>,
        indexer: Arc<dyn Indexer>,
        searcher: Arc<dyn Searcher>,
    ) -> Self {
        Self {
            store,
            indexer,
            searcher,
        }
    }

    /// Logging stand-ins for preflight runs
    pub fn standalone() -> Self {
        use crate::core::standalone::{StandaloneIndexer, StandaloneSearcher, StandaloneStore};

        Self::new(
            Arc::new(StandaloneStore),
            Arc::new(StandaloneIndexer),
            Arc::new(StandaloneSearcher),
        )
    }
}
