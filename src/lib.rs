//! Discovery - boot sequencer for the discovery indexer and searcher
//!
//! Brings the indexing service and its companion query-serving
//! component from "uninitialized" to "fully activated" through a fixed
//! chain of stages, gated by configuration loaded from the environment.
//!
//! # Architecture
//!
//! - **core**: Domain logic (transport-agnostic)
//!   - config, schema, error
//!   - boot (boot levels, sequencer)
//!   - services (collaborator traits), standalone
//!
//! - **cli**: clap adapter (depends on core)
//!   - commands, output
//!
//! The indexing engine, the query-serving engine and the storage
//! client are collaborators behind the traits in [`core::services`].

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use crate::core::boot::{BootLevel, BootSequencer};
pub use crate::core::config::Config;
pub use crate::core::error::{DiscoveryError, Result, ServiceError};
pub use crate::core::schema::{SchemaCredential, Scope};
pub use crate::core::services::{Collaborators, Indexer, Searcher, Store};
