use crate::context::TelemetryLabels;
use tracing::Span;

pub fn with_common_fields(span: &Span, sender: &str, message_id: Option<&str>) {
    span.record("sender", tracing::field::display(sender));
    if let Some(message_id) = message_id {
        span.record("message_id", tracing::field::display(message_id));
    }
}

pub fn record_counter(name: &'static str, value: u64, labels: &TelemetryLabels) {
    let tags: Vec<::metrics::Label> = labels
        .tags()
        .into_iter()
        .map(|(key, value)| ::metrics::Label::new(key, value))
        .collect();
    ::metrics::counter!(name, tags).increment(value);
}
