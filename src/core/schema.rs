//! Visibility scopes and their indexing credentials.

use serde::{Serialize, Serializer};
use std::fmt;

/// Visibility partition of indexed content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Public,
    Protected,
    Private,
}

impl Scope {
    /// All scopes, in the order credentials are loaded
    pub const ALL: [Scope; 3] = [Scope::Public, Scope::Protected, Scope::Private];

    /// Lowercase scope name, also used as the index prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Public => "public",
            Scope::Protected => "protected",
            Scope::Private => "private",
        }
    }

    /// Uppercase form used in environment variable names
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Scope::Public => "PUBLIC",
            Scope::Protected => "PROTECTED",
            Scope::Private => "PRIVATE",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String value that never shows up in logs or output
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

const REDACTED: &str = "********";

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying value
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Raw key bytes, for HMAC verification of searcher access tokens
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

/// Client credentials the indexer uses for one scope
///
/// Only built by the config loader, which guarantees both the key
/// and the secret are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaCredential {
    pub scope: Scope,
    pub client_key: String,
    pub client_secret: Secret,
}

impl SchemaCredential {
    /// Index prefix for documents in this scope
    pub fn index_prefix(&self) -> &'static str {
        self.scope.as_str()
    }
}
