use std::sync::Arc;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tbm_telemetry::{TelemetryLabels, record_counter};

use crate::PLATFORM;
use crate::config::Config;
use crate::content::MessageContent;
use crate::error::ApiError;

const SEND_PATH: &str = "messages/send/";
const OUTBOUND_COUNTER: &str = "tbm_outbound_requests_total";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub open_id: String,
}

/// Body posted to the business messaging send endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub business_id: String,
    pub recipient: Recipient,
    pub message: MessageContent,
}

impl MessageRequest {
    pub fn new(business_id: &str, open_id: &str, message: MessageContent) -> Self {
        Self {
            business_id: business_id.to_string(),
            recipient: Recipient {
                open_id: open_id.to_string(),
            },
            message,
        }
    }
}

/// Client for the business messaging send endpoint.
///
/// Every call is an independent remote send: there is no retry and no
/// idempotency key, so repeating a call repeats the message.
#[derive(Clone)]
pub struct MessagingClient {
    http: reqwest::Client,
    config: Arc<Config>,
    api_base: String,
}

impl MessagingClient {
    pub fn new(http: reqwest::Client, config: Arc<Config>) -> Self {
        let api_base = config.messaging_api_base.trim_end_matches('/').to_string();
        Self {
            http,
            config,
            api_base,
        }
    }

    fn build_url(&self) -> String {
        format!("{}/{}", self.api_base, SEND_PATH)
    }

    /// Posts `content` to `open_id` on behalf of `business_id`. Only a 200
    /// counts as success; the remote error body is not inspected.
    pub async fn send(
        &self,
        business_id: &str,
        open_id: &str,
        content: MessageContent,
    ) -> Result<(), ApiError> {
        let kind = content.kind();
        tracing::debug!(message_type = kind, value = content.value(), "sending tiktok message");
        let payload = MessageRequest::new(business_id, open_id, content);
        let labels = TelemetryLabels::new(PLATFORM)
            .with_endpoint("messages.send")
            .with_message_type(kind);

        let response = self
            .http
            .post(self.build_url())
            .header("Access-Token", &self.config.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                record_counter(OUTBOUND_COUNTER, 1, &labels.clone().with_outcome("transport"));
                tracing::warn!(error = %err, message_type = kind, "tiktok message send failed");
                ApiError::Transport(err)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            record_counter(OUTBOUND_COUNTER, 1, &labels.with_outcome("status"));
            tracing::warn!(
                status = status.as_u16(),
                message_type = kind,
                "tiktok message send rejected"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        record_counter(OUTBOUND_COUNTER, 1, &labels.with_outcome("ok"));
        tracing::debug!(message_type = kind, "tiktok message sent");
        Ok(())
    }

    pub async fn send_text(
        &self,
        business_id: &str,
        open_id: &str,
        text: &str,
    ) -> Result<(), ApiError> {
        self.send(business_id, open_id, MessageContent::text(text))
            .await
    }

    pub async fn send_image(
        &self,
        business_id: &str,
        open_id: &str,
        url: &str,
    ) -> Result<(), ApiError> {
        self.send(business_id, open_id, MessageContent::image(url))
            .await
    }

    pub async fn send_product(
        &self,
        business_id: &str,
        open_id: &str,
        product_id: &str,
    ) -> Result<(), ApiError> {
        self.send(business_id, open_id, MessageContent::product(product_id))
            .await
    }

    pub async fn send_order(
        &self,
        business_id: &str,
        open_id: &str,
        order_id: &str,
    ) -> Result<(), ApiError> {
        self.send(business_id, open_id, MessageContent::order(order_id))
            .await
    }

    pub async fn send_coupon(
        &self,
        business_id: &str,
        open_id: &str,
        coupon_id: &str,
    ) -> Result<(), ApiError> {
        self.send(business_id, open_id, MessageContent::coupon(coupon_id))
            .await
    }

    pub async fn send_return_refund(
        &self,
        business_id: &str,
        open_id: &str,
        return_refund_id: &str,
    ) -> Result<(), ApiError> {
        self.send(
            business_id,
            open_id,
            MessageContent::return_refund(return_refund_id),
        )
        .await
    }
}
