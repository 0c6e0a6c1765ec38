use uuid::Uuid;

/// Generate an OpenTelemetry-compatible trace ID (32 hex characters).
pub fn generate_trace_id() -> String {
    // A UUID without hyphens is exactly 32 hex chars (128 bits).
    Uuid::new_v4().as_simple().to_string()
}

/// Generate a span ID (16 hex characters).
pub fn generate_span_id() -> String {
    Uuid::new_v4().as_simple().to_string()[..16].to_string()
}

/// Create a named span for one CLI operation, returning the span and its
/// trace ID for logging correlation.
pub fn create_operation_span(operation: &str) -> (tracing::Span, String) {
    let trace_id = generate_trace_id();
    let span_id = generate_span_id();
    let span = tracing::info_span!(
        "operation",
        trace_id = %trace_id,
        span_id = %span_id,
        operation = %operation,
    );
    (span, trace_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_id_format() {
        let id = generate_trace_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_span_id_format() {
        let id = generate_span_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn trace_ids_are_unique() {
        assert_ne!(generate_trace_id(), generate_trace_id());
    }
}
