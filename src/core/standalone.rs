//! Stand-in collaborators that only log what they are asked to do
//!
//! Used by `discovery boot` to check a deployment's configuration and
//! boot order without a storage engine or the indexing engines.

use crate::core::config::{EsConfig, IndexerSettings, SearcherSettings};
use crate::core::error::ServiceError;
use crate::core::services::{Indexer, Searcher, ServiceResult, Store};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

fn ensure_live(cancel: &CancellationToken) -> ServiceResult<()> {
    if cancel.is_cancelled() {
        Err(ServiceError::Cancelled)
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandaloneStore;

#[async_trait]
impl Store for StandaloneStore {
    async fn initialize(&self, cancel: &CancellationToken, es: &EsConfig) -> ServiceResult<()> {
        ensure_live(cancel)?;
        tracing::info!(
            addresses = %es.addresses.join(" "),
            max_retries = es.max_retries,
            "Storage client would connect"
        );
        Ok(())
    }

    async fn provision(&self, cancel: &CancellationToken) -> ServiceResult<()> {
        ensure_live(cancel)?;
        tracing::info!("No presets to import");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandaloneIndexer;

#[async_trait]
impl Indexer for StandaloneIndexer {
    async fn initialize(
        &self,
        cancel: &CancellationToken,
        settings: IndexerSettings,
    ) -> ServiceResult<()> {
        ensure_live(cancel)?;
        for schema in &settings.indexer.schemas {
            tracing::info!(
                scope = %schema.scope,
                client_key = %schema.client_key,
                "Indexer would authenticate against {}",
                settings.corteza.auth_url
            );
        }
        Ok(())
    }

    async fn start_watchers(&self, cancel: &CancellationToken) -> ServiceResult<()> {
        ensure_live(cancel)?;
        tracing::info!("Indexer watchers would start");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandaloneSearcher;

#[async_trait]
impl Searcher for StandaloneSearcher {
    async fn initialize(
        &self,
        cancel: &CancellationToken,
        settings: SearcherSettings,
    ) -> ServiceResult<()> {
        ensure_live(cancel)?;
        tracing::info!("Searcher would listen on {}", settings.http_server.addr);
        Ok(())
    }
}
