//! Core domain logic (transport-agnostic)
//!
//! # Architecture
//!
//! - **config**: Configuration loading and validation (environment + `.env`)
//! - **schema**: Visibility scopes and their credentials
//! - **error**: Error types and Result alias
//! - **boot**: Boot levels and the sequencer driving them
//! - **services**: Collaborator traits (store, indexer, searcher)
//! - **standalone**: Logging stand-in collaborators

pub mod boot;
pub mod config;
pub mod error;
pub mod schema;
pub mod services;
pub mod standalone;

// Re-export key types for convenience
pub use boot::{BootLevel, BootSequencer};
pub use config::Config;
pub use error::{DiscoveryError, Result, ServiceError};
pub use services::Collaborators;
