// Integration tests for boot level ordering, idempotency and failures

use crate::common::helpers::{
    INDEXER_INIT, INDEXER_WATCHERS, STORE_INIT, STORE_PROVISION,
};
use crate::common::{full_env, load, Recorder};
use discovery::core::boot::{BootLevel, BootSequencer};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn sequencer(recorder: &Arc<Recorder>) -> BootSequencer {
    BootSequencer::new(Arc::new(load(&full_env())), recorder.collaborators())
}

#[tokio::test]
async fn test_starts_waiting() {
    let recorder = Recorder::new();
    let seq = sequencer(&recorder);

    assert_eq!(seq.level(), BootLevel::Waiting);
    assert!(!seq.is_activated());
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_setup_is_idempotent() {
    let recorder = Recorder::new();
    let mut seq = sequencer(&recorder);
    let cancel = CancellationToken::new();

    seq.setup(&cancel).await.unwrap();
    seq.setup(&cancel).await.unwrap();
    assert_eq!(seq.level(), BootLevel::Setup);
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_setup_honors_cancellation() {
    let recorder = Recorder::new();
    let mut seq = sequencer(&recorder);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = seq.setup(&cancel).await.unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(err.failed_stage(), Some(BootLevel::Setup));
    assert_eq!(seq.level(), BootLevel::Waiting);
}

#[tokio::test]
async fn test_setup_never_lowers_level() {
    let recorder = Recorder::new();
    let mut seq = sequencer(&recorder);
    let cancel = CancellationToken::new();

    seq.provision(&cancel).await.unwrap();
    seq.setup(&cancel).await.unwrap();
    assert_eq!(seq.level(), BootLevel::Provisioned);
}

#[tokio::test]
async fn test_init_store_runs_lower_levels() {
    let recorder = Recorder::new();
    let mut seq = sequencer(&recorder);
    let cancel = CancellationToken::new();

    seq.init_store(&cancel).await.unwrap();

    assert_eq!(seq.level(), BootLevel::StoreInitialized);
    assert_eq!(recorder.calls(), vec![STORE_INIT]);
}

#[tokio::test]
async fn test_each_operation_is_idempotent() {
    let recorder = Recorder::new();
    let mut seq = sequencer(&recorder);
    let cancel = CancellationToken::new();

    seq.init_store(&cancel).await.unwrap();
    seq.init_store(&cancel).await.unwrap();
    seq.provision(&cancel).await.unwrap();
    seq.provision(&cancel).await.unwrap();
    seq.init_services(&cancel).await.unwrap();
    seq.init_services(&cancel).await.unwrap();
    seq.activate(&cancel).await.unwrap();
    seq.activate(&cancel).await.unwrap();

    assert_eq!(seq.level(), BootLevel::Activated);
    assert_eq!(
        recorder.calls(),
        vec![STORE_INIT, STORE_PROVISION, INDEXER_INIT, INDEXER_WATCHERS]
    );
}

#[tokio::test]
async fn test_lower_operation_after_higher_is_noop() {
    let recorder = Recorder::new();
    let mut seq = sequencer(&recorder);
    let cancel = CancellationToken::new();

    seq.activate(&cancel).await.unwrap();
    let calls = recorder.calls();

    seq.init_store(&cancel).await.unwrap();
    seq.init_services(&cancel).await.unwrap();

    assert_eq!(seq.level(), BootLevel::Activated);
    assert_eq!(recorder.calls(), calls);
}

#[tokio::test]
async fn test_level_is_monotonic() {
    let recorder = Recorder::new();
    let mut seq = sequencer(&recorder);
    let cancel = CancellationToken::new();
    let mut observed = vec![seq.level()];

    recorder.fail_once(STORE_PROVISION);
    let _ = seq.init_services(&cancel).await;
    observed.push(seq.level());

    seq.init_store(&cancel).await.unwrap();
    observed.push(seq.level());

    seq.setup(&cancel).await.unwrap();
    observed.push(seq.level());

    seq.activate(&cancel).await.unwrap();
    observed.push(seq.level());

    seq.provision(&cancel).await.unwrap();
    observed.push(seq.level());

    assert!(observed.windows(2).all(|w| w[0] <= w[1]), "{observed:?}");
    assert_eq!(seq.level(), BootLevel::Activated);
}

#[tokio::test]
async fn test_dependency_failure_short_circuits() {
    let recorder = Recorder::new();
    let mut seq = sequencer(&recorder);
    let cancel = CancellationToken::new();

    recorder.fail_once(STORE_INIT);
    let err = seq.activate(&cancel).await.unwrap_err();

    assert_eq!(err.failed_stage(), Some(BootLevel::StoreInitialized));
    assert!(err.is_retryable());
    assert!(!err.is_config_error());
    assert_eq!(seq.level(), BootLevel::Setup);
    assert_eq!(recorder.calls(), vec![STORE_INIT]);
    assert_eq!(recorder.count(INDEXER_INIT), 0);
    assert_eq!(recorder.count(INDEXER_WATCHERS), 0);
}

#[tokio::test]
async fn test_failed_stage_keeps_previous_level() {
    let recorder = Recorder::new();
    let mut seq = sequencer(&recorder);
    let cancel = CancellationToken::new();

    seq.provision(&cancel).await.unwrap();
    recorder.fail_once(INDEXER_INIT);

    let err = seq.init_services(&cancel).await.unwrap_err();
    assert_eq!(err.failed_stage(), Some(BootLevel::ServicesInitialized));
    assert_eq!(seq.level(), BootLevel::Provisioned);
}

#[tokio::test]
async fn test_resume_after_failure() {
    let recorder = Recorder::new();
    let mut seq = sequencer(&recorder);
    let cancel = CancellationToken::new();

    recorder.fail_once(INDEXER_WATCHERS);
    let err = seq.activate(&cancel).await.unwrap_err();
    assert_eq!(err.failed_stage(), Some(BootLevel::Activated));
    assert_eq!(seq.level(), BootLevel::ServicesInitialized);

    seq.activate(&cancel).await.unwrap();

    assert_eq!(seq.level(), BootLevel::Activated);
    assert_eq!(recorder.count(STORE_INIT), 1);
    assert_eq!(recorder.count(STORE_PROVISION), 1);
    assert_eq!(recorder.count(INDEXER_INIT), 1);
    assert_eq!(recorder.count(INDEXER_WATCHERS), 2);
}

#[tokio::test]
async fn test_repeated_failure_does_not_advance() {
    let recorder = Recorder::new();
    let mut seq = sequencer(&recorder);
    let cancel = CancellationToken::new();

    recorder.fail_always(STORE_PROVISION);
    for _ in 0..3 {
        let err = seq.activate(&cancel).await.unwrap_err();
        assert_eq!(err.failed_stage(), Some(BootLevel::Provisioned));
        assert_eq!(seq.level(), BootLevel::StoreInitialized);
    }
    assert_eq!(recorder.count(STORE_INIT), 1);
    assert_eq!(recorder.count(STORE_PROVISION), 3);

    recorder.clear_failures();
    seq.activate(&cancel).await.unwrap();
    assert!(seq.is_activated());
}

#[tokio::test]
async fn test_advance_to_stops_at_target() {
    let recorder = Recorder::new();
    let mut seq = sequencer(&recorder);
    let cancel = CancellationToken::new();

    seq.advance_to(&cancel, BootLevel::Provisioned).await.unwrap();
    assert_eq!(seq.level(), BootLevel::Provisioned);
    assert_eq!(recorder.calls(), vec![STORE_INIT, STORE_PROVISION]);

    seq.advance_to(&cancel, BootLevel::Waiting).await.unwrap();
    assert_eq!(seq.level(), BootLevel::Provisioned);
}

#[tokio::test]
async fn test_stage_error_message_names_stage() {
    let recorder = Recorder::new();
    let mut seq = sequencer(&recorder);
    let cancel = CancellationToken::new();

    recorder.fail_once(STORE_PROVISION);
    let err = seq.provision(&cancel).await.unwrap_err();

    assert!(err.message().contains("provisioned"));
    assert!(err.message().contains(STORE_PROVISION));
}
