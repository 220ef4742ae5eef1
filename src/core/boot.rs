//! Boot sequencer
//!
//! Brings the process from [`BootLevel::Waiting`] to
//! [`BootLevel::Activated`] one level at a time. Asking for a level
//! first walks every lower level that has not been reached yet, and
//! the first failure stops the walk.
//!
//! # Guarantees
//!
//! - The level never decreases.
//! - A level is recorded only after its own work succeeded, so a
//!   retried call resumes at the stage that failed.
//! - Reached levels are never re-run; every operation is idempotent.
//! - Stage operations take `&mut self`. Callers sharing a sequencer
//!   between tasks must serialize access, e.g. with a mutex.

use crate::core::config::Config;
use crate::core::error::{DiscoveryError, Result, ServiceError};
use crate::core::services::{Collaborators, ServiceResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Point in the startup ordering
///
/// Variants are declared in boot order; the derived `Ord` is the
/// ordering the sequencer relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BootLevel {
    Waiting,
    Setup,
    StoreInitialized,
    Provisioned,
    ServicesInitialized,
    Activated,
}

impl BootLevel {
    /// Levels reached through a stage, in the order they run
    pub const STAGES: [BootLevel; 5] = [
        BootLevel::Setup,
        BootLevel::StoreInitialized,
        BootLevel::Provisioned,
        BootLevel::ServicesInitialized,
        BootLevel::Activated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BootLevel::Waiting => "waiting",
            BootLevel::Setup => "setup",
            BootLevel::StoreInitialized => "store-initialized",
            BootLevel::Provisioned => "provisioned",
            BootLevel::ServicesInitialized => "services-initialized",
            BootLevel::Activated => "activated",
        }
    }
}

impl fmt::Display for BootLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BootLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        [BootLevel::Waiting]
            .into_iter()
            .chain(BootLevel::STAGES)
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| format!("unknown boot level '{s}'"))
    }
}

/// Owns the boot level and drives collaborators through the stages
pub struct BootSequencer {
    level: BootLevel,
    config: Arc<Config>,
    collaborators: Collaborators,
}

impl BootSequencer {
    /// Create a sequencer at [`BootLevel::Waiting`]
    pub fn new(config: Arc<Config>, collaborators: Collaborators) -> Self {
        Self {
            level: BootLevel::Waiting,
            config,
            collaborators,
        }
    }

    /// Current boot level
    pub fn level(&self) -> BootLevel {
        self.level
    }

    pub fn is_activated(&self) -> bool {
        self.level == BootLevel::Activated
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Mark the configuration phase complete
    pub async fn setup(&mut self, cancel: &CancellationToken) -> Result<()> {
        self.advance_to(cancel, BootLevel::Setup).await
    }

    /// Initialize the storage client and upgrade its schema
    pub async fn init_store(&mut self, cancel: &CancellationToken) -> Result<()> {
        self.advance_to(cancel, BootLevel::StoreInitialized).await
    }

    /// Import preset configuration and run autodiscovery
    pub async fn provision(&mut self, cancel: &CancellationToken) -> Result<()> {
        self.advance_to(cancel, BootLevel::Provisioned).await
    }

    /// Initialize the enabled indexer and searcher
    pub async fn init_services(&mut self, cancel: &CancellationToken) -> Result<()> {
        self.advance_to(cancel, BootLevel::ServicesInitialized).await
    }

    /// Start background watchers; the last stage
    pub async fn activate(&mut self, cancel: &CancellationToken) -> Result<()> {
        self.advance_to(cancel, BootLevel::Activated).await
    }

    /// Run every stage up to and including `target`
    ///
    /// Stages already reached are skipped. On failure the level stays
    /// at the last stage that succeeded and the error names the stage
    /// that failed.
    pub async fn advance_to(&mut self, cancel: &CancellationToken, target: BootLevel) -> Result<()> {
        for stage in BootLevel::STAGES {
            if stage > target {
                break;
            }
            if self.level >= stage {
                continue;
            }

            let started = Instant::now();
            let span = tracing::info_span!("boot_stage", stage = %stage);

            if let Err(source) = self.run_stage(stage, cancel).instrument(span).await {
                tracing::error!("Boot stage '{}' failed: {}", stage, source);
                return Err(DiscoveryError::StageFailed { stage, source });
            }

            self.reach(stage, started);
        }

        Ok(())
    }

    /// Own work of a single stage
    async fn run_stage(&self, stage: BootLevel, cancel: &CancellationToken) -> ServiceResult<()> {
        if cancel.is_cancelled() {
            return Err(ServiceError::Cancelled);
        }

        match stage {
            BootLevel::Waiting | BootLevel::Setup => Ok(()),
            BootLevel::StoreInitialized => {
                self.collaborators
                    .store
                    .initialize(cancel, &self.config.es)
                    .await
            }
            BootLevel::Provisioned => self.collaborators.store.provision(cancel).await,
            BootLevel::ServicesInitialized => {
                // Checked before any initializer runs
                if self.config.searcher.enabled {
                    if let Some(var) = self.config.searcher.missing_credential() {
                        return Err(ServiceError::InitFailed(format!(
                            "searcher client credential ({var}) is empty or missing"
                        )));
                    }
                }

                if self.config.indexer.enabled {
                    self.collaborators
                        .indexer
                        .initialize(cancel, self.config.indexer_settings())
                        .await?;
                } else {
                    tracing::info!("Indexer disabled, skipping");
                }

                if self.config.searcher.enabled {
                    self.collaborators
                        .searcher
                        .initialize(cancel, self.config.searcher_settings())
                        .await?;
                } else {
                    tracing::info!("Searcher disabled, skipping");
                }

                Ok(())
            }
            BootLevel::Activated => {
                if self.config.indexer.enabled {
                    self.collaborators.indexer.start_watchers(cancel).await
                } else {
                    Ok(())
                }
            }
        }
    }

    fn reach(&mut self, stage: BootLevel, started: Instant) {
        debug_assert!(stage > self.level);
        self.level = stage;
        tracing::info!(
            "Reached boot level '{}' in {}ms",
            stage,
            started.elapsed().as_millis()
        );
    }
}
