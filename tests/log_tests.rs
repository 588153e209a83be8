use own_lab::error::LogError;
use own_lab::logging::{TraceKind, TraceLog};
use own_lab::scenario::{DemoConfig, Demonstrator};
use own_lab::types::ResourceId;

#[test]
fn test_empty_log_verifies() {
    let log = TraceLog::new();
    assert!(log.is_empty());
    assert!(log.verify_integrity().is_ok());
}

#[test]
fn test_chain_links_sequential_events() {
    let log = TraceLog::new();
    let r = ResourceId::new();
    log.record(TraceKind::Created, r, None);
    log.record(TraceKind::Cloned, r, Some(2));
    log.record(TraceKind::Released, r, Some(1));
    log.record(TraceKind::Destroyed, r, Some(0));

    let events = log.events();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0].prev_hash, [0u8; 32]);
    for pair in events.windows(2) {
        assert_eq!(pair[1].prev_hash, pair[0].hash);
        assert_eq!(pair[1].seq, pair[0].seq + 1);
    }
    assert!(log.verify_integrity().is_ok());
}

#[test]
fn test_tampered_event_is_detected() {
    let log = TraceLog::new();
    let r = ResourceId::new();
    log.record(TraceKind::Created, r, None);
    log.record(TraceKind::Destroyed, r, Some(0));

    log.tamper_with(0, TraceKind::Released);

    assert_eq!(
        log.verify_integrity(),
        Err(LogError::IntegrityViolation { index: 0 })
    );
}

#[test]
fn test_scenario_run_produces_a_valid_chain() {
    let demo = Demonstrator::with_config(DemoConfig { echo_trace: false });
    demo.run_all().unwrap();
    assert!(demo.log().len() > 0);
    assert!(demo.log().verify_integrity().is_ok());
}

#[test]
fn test_events_serialize() {
    let log = TraceLog::new();
    let r = ResourceId::new();
    log.record(TraceKind::Created, r, Some(1));
    let body = serde_json::to_string(&log.events()).unwrap();
    assert!(body.contains("Created"));
}
