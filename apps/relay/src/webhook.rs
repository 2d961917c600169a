//! Webhook dispatcher: the GET verification handshake and observe-only
//! ingestion of messaging events. Nothing is sent back to the sender.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tbm_core::{MessagePayload, PLATFORM, WebhookEvent};
use tbm_telemetry::{TelemetryLabels, record_counter, with_common_fields};

use crate::AppState;
use crate::query::QueryParams;

const WEBHOOK_EVENT_COUNTER: &str = "tbm_webhook_events_total";
const MESSAGE_SPAN_NAME: &str = "webhook.message";

#[derive(Debug, Default)]
pub struct VerifyQs {
    pub mode: Option<String>,
    pub challenge: Option<String>,
    pub token: Option<String>,
}

impl VerifyQs {
    /// Reads the `hub.*` parameters. A repeated key keeps its first value.
    pub fn from_params(params: &QueryParams) -> Self {
        let take = |key: &str| params.get(key).map(str::to_string);
        Self {
            mode: take("hub.mode"),
            challenge: take("hub.challenge"),
            token: take("hub.verify_token"),
        }
    }
}

/// Returns the challenge to echo when the handshake is valid.
pub fn check_verification(q: &VerifyQs, expected_token: &str) -> Option<String> {
    let supplied = q.token.as_deref().unwrap_or_default();
    let token_ok: bool = supplied.as_bytes().ct_eq(expected_token.as_bytes()).into();
    (q.mode.as_deref() == Some("subscribe") && token_ok)
        .then(|| q.challenge.clone().unwrap_or_default())
}

pub async fn verify(State(state): State<AppState>, params: QueryParams) -> Response {
    let q = VerifyQs::from_params(&params);
    match check_verification(&q, &state.config.verify_token) {
        Some(challenge) => {
            tracing::info!("webhook verified");
            (StatusCode::OK, challenge).into_response()
        }
        None => {
            tracing::warn!(
                mode = q.mode.as_deref().unwrap_or(""),
                "webhook verification failed"
            );
            (StatusCode::FORBIDDEN, "Forbidden").into_response()
        }
    }
}

pub async fn receive(body: Bytes) -> Response {
    let event = match WebhookEvent::from_slice(&body) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!("failed to decode webhook payload: {err}");
            return (StatusCode::BAD_REQUEST, "Failed to parse JSON").into_response();
        }
    };

    let processed = dispatch(&event);
    tracing::debug!(processed, "webhook event handled");
    StatusCode::OK.into_response()
}

/// Logs every messaging event, entries in order and events in order within
/// each entry. Returns how many events were seen.
pub fn dispatch(event: &WebhookEvent) -> usize {
    tracing::info!(
        object = %event.object,
        entries = event.entry.len(),
        "received webhook event"
    );

    let mut processed = 0;
    for messaging in event.messaging_events() {
        let message = &messaging.message;
        let kind = message.kind();
        let span = tracing::info_span!(
            MESSAGE_SPAN_NAME,
            sender = tracing::field::Empty,
            message_id = tracing::field::Empty,
            message_type = %kind
        );
        with_common_fields(&span, &messaging.sender.id, Some(message.mid.as_str()));
        let _guard = span.enter();

        tracing::info!(
            sender = %messaging.sender.id,
            message_type = %kind,
            "received message"
        );
        match (&message.payload, message.payload.detail()) {
            (_, Some((field, value))) => {
                tracing::info!(
                    payload_field = field,
                    payload_value = value,
                    "message payload"
                );
            }
            (MessagePayload::Unknown(_), None) => {
                tracing::info!(message_type = %kind, "unrecognised message type");
            }
            (_, None) => {
                tracing::info!(message_type = %kind, "message payload missing");
            }
        }

        record_counter(
            WEBHOOK_EVENT_COUNTER,
            1,
            &TelemetryLabels::new(PLATFORM).with_message_type(kind),
        );
        processed += 1;
    }
    processed
}
