//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod boot;
pub mod completions;
pub mod config;

// Re-export argument types for use in mod.rs
pub use boot::BootArgs;
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
