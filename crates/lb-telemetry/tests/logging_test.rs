use lb_telemetry::logging::{self, LogFormat};
use lb_telemetry::tracing_setup::create_operation_span;

#[test]
fn test_init_logging_human() {
    // Should not panic; second call is a safe no-op.
    logging::init_logging("test-service", "debug", LogFormat::Human);
    assert!(!logging::init_logging("test-service", "info", LogFormat::Human));

    tracing::info!(key = "value", "human-readable log line");
}

#[test]
fn test_init_logging_json() {
    // The global subscriber may already be set by another test; that is a no-op.
    logging::init_logging("test-service-json", "info", LogFormat::Json);

    tracing::info!(key = "value", "json log line");
}

#[test]
fn operation_span_can_be_entered_after_init() {
    logging::init_logging("span-test", "info", LogFormat::Human);
    let (span, trace_id) = create_operation_span("move");
    assert_eq!(trace_id.len(), 32);
    let _guard = span.enter();
    tracing::info!("inside operation span");
}
