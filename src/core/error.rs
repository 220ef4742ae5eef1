//! Error types and error handling for the discovery boot sequence.
//!
//! Configuration problems ("fix your environment") and stage failures
//! ("a dependency is unreachable, retry") are kept as distinct
//! variants so the binary can report them differently.

use crate::core::boot::BootLevel;
use thiserror::Error;

/// Result type alias for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Main error type for the discovery service
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Boot stage '{stage}' failed: {source}")]
    StageFailed {
        stage: BootLevel,
        #[source]
        source: ServiceError,
    },
}

/// Errors reported by external collaborators (store, indexer, searcher)
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Initialization failed: {0}")]
    InitFailed(String),

    #[error("Watcher failed: {0}")]
    WatcherFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Check if retrying the boot call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Unavailable(_) | ServiceError::Io(_))
    }
}

impl DiscoveryError {
    /// Build a configuration error from any message
    pub fn config(message: impl Into<String>) -> Self {
        DiscoveryError::ConfigError(message.into())
    }

    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this error was caused by invalid configuration
    pub fn is_config_error(&self) -> bool {
        matches!(self, DiscoveryError::ConfigError(_))
    }

    /// Stage that failed, if this is a stage failure
    pub fn failed_stage(&self) -> Option<BootLevel> {
        match self {
            DiscoveryError::StageFailed { stage, .. } => Some(*stage),
            DiscoveryError::ConfigError(_) => None,
        }
    }

    /// Check if the boot was aborted through the cancellation token
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            DiscoveryError::StageFailed {
                source: ServiceError::Cancelled,
                ..
            }
        )
    }

    /// Check if re-invoking the boot sequence may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            DiscoveryError::ConfigError(_) => false,
            DiscoveryError::StageFailed { source, .. } => source.is_retryable(),
        }
    }

    /// Process exit status for this error
    ///
    /// Configuration errors exit with 2, everything else with 1.
    pub fn exit_code(&self) -> i32 {
        if self.is_config_error() {
            2
        } else {
            1
        }
    }
}
