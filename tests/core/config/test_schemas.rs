// Integration tests for per-scope credential loading

use crate::common::{env_of, full_env, load, load_err, with, without};
use discovery::core::config::{schema_key_var, schema_secret_var, ENV_ES_ADDRESS};
use discovery::core::schema::Scope;

#[test]
fn test_all_scopes_loaded_in_order() {
    let config = load(&full_env());

    let scopes: Vec<Scope> = config.indexer.schemas.iter().map(|s| s.scope).collect();
    assert_eq!(scopes, vec![Scope::Public, Scope::Protected, Scope::Private]);

    let private = config.schema(Scope::Private).expect("private scope");
    assert_eq!(private.client_key, "private-key");
    assert_eq!(private.client_secret.expose(), "private-secret");
    assert_eq!(private.index_prefix(), "private");
}

#[test]
fn test_public_and_private_only() {
    let env = env_of(&[
        ("DISCOVERY_INDEXER_PUBLIC_INDEX_CLIENT_KEY", "pub"),
        ("DISCOVERY_INDEXER_PUBLIC_INDEX_CLIENT_SECRET", "pub-secret"),
        ("DISCOVERY_INDEXER_PRIVATE_INDEX_CLIENT_KEY", "priv"),
        ("DISCOVERY_INDEXER_PRIVATE_INDEX_CLIENT_SECRET", "priv-secret"),
    ]);
    let config = load(&env);

    assert_eq!(config.indexer.schemas.len(), 2);
    assert!(config.schema(Scope::Public).is_some());
    assert!(config.schema(Scope::Protected).is_none());
    assert!(config.schema(Scope::Private).is_some());
}

#[test]
fn test_key_without_secret_names_scope() {
    let env = without(full_env(), &schema_secret_var(Scope::Protected));
    let err = load_err(&env);

    assert!(err.is_config_error());
    assert!(err.message().contains("'protected'"));
    assert!(err.message().contains(&schema_secret_var(Scope::Protected)));
}

#[test]
fn test_empty_secret_names_scope() {
    let env = with(full_env(), &schema_secret_var(Scope::Private), "");
    let err = load_err(&env);
    assert!(err.message().contains("'private'"));
}

#[test]
fn test_empty_key_names_scope() {
    let env = with(full_env(), &schema_key_var(Scope::Public), "");
    let err = load_err(&env);

    assert!(err.message().contains("'public'"));
    assert!(err.message().contains("client key"));
}

#[test]
fn test_secret_without_key_is_skipped() {
    let env = without(full_env(), &schema_key_var(Scope::Protected));
    let config = load(&env);

    assert_eq!(config.indexer.schemas.len(), 2);
    assert!(config.schema(Scope::Protected).is_none());
}

#[test]
fn test_no_scopes_configured() {
    let env = env_of(&[("DISCOVERY_SEARCHER_ENABLED", "false")]);
    let err = load_err(&env);

    assert!(err.is_config_error());
    assert!(err.message().contains("at least one"));
}

#[test]
fn test_first_failing_scope_reported() {
    // Both public and private are broken; scopes are checked in order
    let env = with(
        with(full_env(), &schema_key_var(Scope::Public), ""),
        &schema_secret_var(Scope::Private),
        "",
    );
    let err = load_err(&env);
    assert!(err.message().contains("'public'"));
    assert!(!err.message().contains("'private'"));
}

#[test]
fn test_schema_error_precedes_address_parsing() {
    let env = with(
        env_of(&[("DISCOVERY_SEARCHER_ENABLED", "false")]),
        ENV_ES_ADDRESS,
        "http://a:1",
    );
    let err = load_err(&env);
    assert!(err.message().contains("at least one"));
}
