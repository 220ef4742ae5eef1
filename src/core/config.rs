//! Configuration management for the discovery indexer and searcher.
//!
//! All settings come from environment variables, optionally backed by
//! a `.env` file. Loading is a pure function of an [`EnvSource`], so it
//! can be exercised without touching the process environment.
//!
//! Validation runs in a fixed order and stops at the first problem:
//! base URL, endpoints, storage knobs, schema credentials, storage
//! addresses, then indexer and searcher options. Searcher client
//! credentials are optional here; the boot sequence rejects an enabled
//! searcher without them.

use crate::core::error::{DiscoveryError, Result};
use crate::core::schema::{SchemaCredential, Scope, Secret};
use serde::Serialize;
use std::collections::HashMap;
use std::env::{self, VarError};
use std::path::Path;
use std::str::FromStr;

pub const ENV_BASE_URL: &str = "DISCOVERY_INDEXER_CORTEZA_SERVER_BASE_URL";
pub const ENV_AUTH_URL: &str = "DISCOVERY_INDEXER_CORTEZA_SERVER_AUTH";
pub const ENV_DISCOVERY_API_URL: &str = "DISCOVERY_INDEXER_CORTEZA_SERVER_API_DISCOVERY";
pub const ENV_HTTP_ADDR: &str = "DISCOVERY_INDEXER_HTTP_ADDR";
pub const ENV_ES_ADDRESS: &str = "DISCOVERY_INDEXER_ES_ADDRESS";
pub const ENV_ES_ADDRESS_FALLBACK: &str = "ES_ADDRESS";
pub const ENV_ES_RETRY_ON_TIMEOUT: &str = "ES_ENABLE_RETRY_ON_TIMEOUT";
pub const ENV_ES_MAX_RETRIES: &str = "ES_MAX_RETRIES";
pub const ENV_INDEX_INTERVAL: &str = "INDEX_INTERVAL";
pub const ENV_INDEX_INTERVAL_FALLBACK: &str = "ES_INDEX_INTERVAL";
pub const ENV_INDEXER_ENABLED: &str = "DISCOVERY_INDEXER_ENABLED";
pub const ENV_SEARCHER_ENABLED: &str = "DISCOVERY_SEARCHER_ENABLED";
pub const ENV_SEARCHER_JWT_SECRET: &str = "DISCOVERY_SEARCHER_CORTEZA_SERVER_JWT_SECRET";
pub const ENV_SEARCHER_CLIENT_KEY: &str = "DISCOVERY_SEARCHER_CORTEZA_SERVER_CLIENT_KEY";
pub const ENV_SEARCHER_CLIENT_SECRET: &str = "DISCOVERY_SEARCHER_CORTEZA_SERVER_CLIENT_SECRET";

pub const DEFAULT_BASE_URL: &str = "http://server:80";
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:3201";
pub const DEFAULT_ES_ADDRESS: &str = "http://es:9200";
pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_INDEX_INTERVAL_SECS: u64 = 10;

/// Environment variable name holding the client key for a scope
pub fn schema_key_var(scope: Scope) -> String {
    format!("DISCOVERY_INDEXER_{}_INDEX_CLIENT_KEY", scope.env_prefix())
}

/// Environment variable name holding the client secret for a scope
pub fn schema_secret_var(scope: Scope) -> String {
    format!("DISCOVERY_INDEXER_{}_INDEX_CLIENT_SECRET", scope.env_prefix())
}

/// Lookup of environment-style variables
pub trait EnvSource {
    /// Value of `key`, or `None` when the variable is not set
    ///
    /// Fails when the variable is set but unusable (not valid UTF-8).
    fn var(&self, key: &str) -> Result<Option<String>>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Result<Option<String>> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(DiscoveryError::config(format!(
                "{key} is set but is not valid UTF-8"
            ))),
        }
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key).cloned())
    }
}

/// Process environment on top of the variables of a `.env` file
///
/// Process variables win, matching dotenv semantics, but the process
/// environment itself is never modified.
#[derive(Debug, Clone, Default)]
pub struct LayeredEnv {
    file: HashMap<String, String>,
}

impl LayeredEnv {
    /// Parse a `.env` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let entries = dotenvy::from_path_iter(path).map_err(|e| {
            DiscoveryError::config(format!(
                "Failed to read env file {}: {e}",
                path.display()
            ))
        })?;

        let mut file = HashMap::new();
        for entry in entries {
            let (key, value) = entry.map_err(|e| {
                DiscoveryError::config(format!(
                    "Failed to parse env file {}: {e}",
                    path.display()
                ))
            })?;
            file.insert(key, value);
        }

        Ok(Self { file })
    }

    /// Number of variables read from the file
    pub fn file_len(&self) -> usize {
        self.file.len()
    }
}

impl EnvSource for LayeredEnv {
    fn var(&self, key: &str) -> Result<Option<String>> {
        Ok(ProcessEnv
            .var(key)?
            .or_else(|| self.file.get(key).cloned()))
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub corteza: CortezaConfig,
    pub http_server: HttpServerConfig,
    pub es: EsConfig,
    pub indexer: IndexerConfig,
    pub searcher: SearcherConfig,
}

/// Endpoints of the Corteza server the indexer talks to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CortezaConfig {
    pub base_url: String,
    pub auth_url: String,
    pub discovery_api_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpServerConfig {
    /// Listen address of the searcher HTTP API
    pub addr: String,
}

/// Storage engine connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EsConfig {
    /// Node addresses, in the order they were configured
    pub addresses: Vec<String>,
    pub enable_retry_on_timeout: bool,
    pub max_retries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexerConfig {
    pub enabled: bool,

    /// Seconds between indexing runs
    pub index_interval_secs: u64,

    /// Credentials per scope, always in `Scope::ALL` order
    pub schemas: Vec<SchemaCredential>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearcherConfig {
    pub enabled: bool,

    /// Signing key the searcher verifies access tokens with; its raw
    /// bytes are the HMAC key (see [`Secret::as_bytes`])
    pub jwt_secret: Option<Secret>,

    /// Required before an enabled searcher can be initialized
    pub client_key: Option<String>,
    pub client_secret: Option<Secret>,
}

impl SearcherConfig {
    /// Variable of the first missing client credential, if any
    pub fn missing_credential(&self) -> Option<&'static str> {
        if self.client_key.is_none() {
            Some(ENV_SEARCHER_CLIENT_KEY)
        } else if self.client_secret.is_none() {
            Some(ENV_SEARCHER_CLIENT_SECRET)
        } else {
            None
        }
    }
}

/// Configuration subset handed to the indexer
#[derive(Debug, Clone)]
pub struct IndexerSettings {
    pub corteza: CortezaConfig,
    pub es: EsConfig,
    pub indexer: IndexerConfig,
}

/// Configuration subset handed to the searcher
#[derive(Debug, Clone)]
pub struct SearcherSettings {
    pub corteza: CortezaConfig,
    pub es: EsConfig,
    pub http_server: HttpServerConfig,
    pub searcher: SearcherConfig,
}

impl Config {
    /// Load config from the process environment
    ///
    /// A `.env` file in the working directory is read when present;
    /// process variables take precedence over it.
    pub fn load() -> Result<Self> {
        let dotenv = Path::new(".env");
        if dotenv.exists() {
            Self::load_with_env_file(dotenv)
        } else {
            Self::from_env(&ProcessEnv)
        }
    }

    /// Load config from the process environment layered over `path`
    pub fn load_with_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let env = LayeredEnv::from_file(path.as_ref())?;
        tracing::debug!(
            "Read {} variable(s) from {}",
            env.file_len(),
            path.as_ref().display()
        );
        Self::from_env(&env)
    }

    /// Build and validate config from an arbitrary variable source
    pub fn from_env(env: &impl EnvSource) -> Result<Self> {
        let base_url = env_string(env, ENV_BASE_URL, DEFAULT_BASE_URL)?;
        let corteza = resolve_endpoints(env, base_url)?;

        let http_server = HttpServerConfig {
            addr: env_string(env, ENV_HTTP_ADDR, DEFAULT_HTTP_ADDR)?,
        };

        let enable_retry_on_timeout = env_bool(env, ENV_ES_RETRY_ON_TIMEOUT, true)?;
        let max_retries = env_parse(env, ENV_ES_MAX_RETRIES, DEFAULT_MAX_RETRIES)?;
        let interval_var = if is_set(env, ENV_INDEX_INTERVAL)? {
            ENV_INDEX_INTERVAL
        } else {
            ENV_INDEX_INTERVAL_FALLBACK
        };
        let index_interval_secs = env_parse(env, interval_var, DEFAULT_INDEX_INTERVAL_SECS)?;

        let schemas = load_schemas(env)?;

        let es = EsConfig {
            addresses: load_addresses(env)?,
            enable_retry_on_timeout,
            max_retries,
        };

        let indexer = IndexerConfig {
            enabled: env_bool(env, ENV_INDEXER_ENABLED, true)?,
            index_interval_secs,
            schemas,
        };

        let searcher = load_searcher(env)?;

        Ok(Self {
            corteza,
            http_server,
            es,
            indexer,
            searcher,
        })
    }

    /// Credential for a scope, if configured
    pub fn schema(&self, scope: Scope) -> Option<&SchemaCredential> {
        self.indexer.schemas.iter().find(|s| s.scope == scope)
    }

    pub fn indexer_settings(&self) -> IndexerSettings {
        IndexerSettings {
            corteza: self.corteza.clone(),
            es: self.es.clone(),
            indexer: self.indexer.clone(),
        }
    }

    pub fn searcher_settings(&self) -> SearcherSettings {
        SearcherSettings {
            corteza: self.corteza.clone(),
            es: self.es.clone(),
            http_server: self.http_server.clone(),
            searcher: self.searcher.clone(),
        }
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Corteza base URL: {}", self.corteza.base_url);
        tracing::info!("  Corteza auth: {}", self.corteza.auth_url);
        tracing::info!("  Corteza discovery API: {}", self.corteza.discovery_api_url);
        tracing::info!("  HTTP address: {}", self.http_server.addr);
        tracing::info!("  Storage addresses: {}", self.es.addresses.join(" "));
        tracing::info!(
            "  Retry on timeout: {} (max {} retries)",
            self.es.enable_retry_on_timeout,
            self.es.max_retries
        );
        tracing::info!(
            "  Indexer: {} (every {}s)",
            enabled_str(self.indexer.enabled),
            self.indexer.index_interval_secs
        );
        let scopes: Vec<&str> = self
            .indexer
            .schemas
            .iter()
            .map(|s| s.scope.as_str())
            .collect();
        tracing::info!("  Schemas: {}", scopes.join(", "));
        tracing::info!(
            "  Searcher: {} (JWT secret {})",
            enabled_str(self.searcher.enabled),
            if self.searcher.jwt_secret.is_some() {
                "set"
            } else {
                "not set"
            }
        );
    }
}

fn enabled_str(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

/// Value of `key` verbatim when set (even if empty), `default` otherwise
fn env_string(env: &impl EnvSource, key: &str, default: &str) -> Result<String> {
    Ok(env.var(key)?.unwrap_or_else(|| default.to_string()))
}

fn is_set(env: &impl EnvSource, key: &str) -> Result<bool> {
    Ok(env.var(key)?.is_some_and(|v| !v.trim().is_empty()))
}

fn env_parse<T: FromStr>(env: &impl EnvSource, key: &str, default: T) -> Result<T> {
    match env.var(key)? {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|_| {
            DiscoveryError::config(format!(
                "invalid value '{raw}' for {key}: expected a non-negative integer"
            ))
        }),
        _ => Ok(default),
    }
}

fn env_bool(env: &impl EnvSource, key: &str, default: bool) -> Result<bool> {
    match env.var(key)? {
        Some(raw) if !raw.trim().is_empty() => parse_bool(raw.trim()).ok_or_else(|| {
            DiscoveryError::config(format!(
                "invalid value '{raw}' for {key}: expected true or false"
            ))
        }),
        _ => Ok(default),
    }
}

/// Boolean spellings accepted for flags
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Join a base URL and an absolute path, empty when the base is empty
fn derive_endpoint(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.is_empty() {
        String::new()
    } else {
        format!("{base}{path}")
    }
}

fn resolve_endpoints(env: &impl EnvSource, base_url: String) -> Result<CortezaConfig> {
    let auth_url = env
        .var(ENV_AUTH_URL)?
        .unwrap_or_else(|| derive_endpoint(&base_url, "/auth"));
    if auth_url.is_empty() {
        return Err(DiscoveryError::config(format!(
            "Corteza auth endpoint is empty, set it directly with {ENV_AUTH_URL} \
             or indirectly with {ENV_BASE_URL}"
        )));
    }

    let discovery_api_url = env
        .var(ENV_DISCOVERY_API_URL)?
        .unwrap_or_else(|| derive_endpoint(&base_url, "/api/discovery"));
    if discovery_api_url.is_empty() {
        return Err(DiscoveryError::config(format!(
            "Corteza discovery API endpoint is empty, set it directly with \
             {ENV_DISCOVERY_API_URL} or indirectly with {ENV_BASE_URL}"
        )));
    }

    Ok(CortezaConfig {
        base_url,
        auth_url,
        discovery_api_url,
    })
}

fn load_schemas(env: &impl EnvSource) -> Result<Vec<SchemaCredential>> {
    let mut schemas = Vec::new();

    for scope in Scope::ALL {
        let key_var = schema_key_var(scope);
        let secret_var = schema_secret_var(scope);

        let Some(client_key) = env.var(&key_var)? else {
            continue;
        };
        if client_key.is_empty() {
            return Err(DiscoveryError::config(format!(
                "client key ({key_var}) for '{scope}' is empty or missing"
            )));
        }

        let client_secret = env.var(&secret_var)?.unwrap_or_default();
        if client_secret.is_empty() {
            return Err(DiscoveryError::config(format!(
                "client secret ({secret_var}) for '{scope}' is empty or missing"
            )));
        }

        schemas.push(SchemaCredential {
            scope,
            client_key,
            client_secret: Secret::new(client_secret),
        });
    }

    if schemas.is_empty() {
        return Err(DiscoveryError::config(
            "set at least one client key/secret pair using \
             DISCOVERY_INDEXER_<SCOPE>_INDEX_CLIENT_KEY and \
             DISCOVERY_INDEXER_<SCOPE>_INDEX_CLIENT_SECRET where scope is one of \
             'public', 'protected' or 'private'",
        ));
    }

    Ok(schemas)
}

/// Split a whitespace separated address list, dropping empty tokens
pub fn parse_addresses(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

fn load_addresses(env: &impl EnvSource) -> Result<Vec<String>> {
    let raw = if is_set(env, ENV_ES_ADDRESS)? {
        env.var(ENV_ES_ADDRESS)?
    } else {
        env.var(ENV_ES_ADDRESS_FALLBACK)?
    };

    let addresses = raw.as_deref().map(parse_addresses).unwrap_or_default();
    if addresses.is_empty() {
        Ok(vec![DEFAULT_ES_ADDRESS.to_string()])
    } else {
        Ok(addresses)
    }
}

fn non_empty(env: &impl EnvSource, key: &str) -> Result<Option<String>> {
    Ok(env.var(key)?.filter(|s| !s.is_empty()))
}

fn load_searcher(env: &impl EnvSource) -> Result<SearcherConfig> {
    Ok(SearcherConfig {
        enabled: env_bool(env, ENV_SEARCHER_ENABLED, true)?,
        jwt_secret: non_empty(env, ENV_SEARCHER_JWT_SECRET)?.map(Secret::new),
        client_key: non_empty(env, ENV_SEARCHER_CLIENT_KEY)?,
        client_secret: non_empty(env, ENV_SEARCHER_CLIENT_SECRET)?.map(Secret::new),
    })
}
