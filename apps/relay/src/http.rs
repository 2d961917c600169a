//! Outward-facing JSON endpoints that forward to the messaging and
//! marketing APIs.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    middleware,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tbm_core::{CampaignResponse, MessageContent, ReportResponse};

use crate::AppState;
use crate::cors::cors;
use crate::error::RelayError;
use crate::query::QueryParams;

/// The three API routes, wrapped in the CORS middleware.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/messages/send", post(send_message))
        .route("/api/marketing/campaigns", get(list_campaigns))
        .route("/api/marketing/report", get(get_report))
        .layer(middleware::from_fn(cors))
}

/// Local send request. `type` defaults to `text`; only the field matching
/// the type is read.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SendMessageRequest {
    pub business_id: String,
    pub open_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub url: String,
    pub product_id: String,
    pub order_id: String,
    pub coupon_id: String,
    pub return_refund_id: String,
}

impl SendMessageRequest {
    /// Validates required fields and builds the outbound content.
    pub fn into_content(self) -> Result<(String, String, MessageContent), RelayError> {
        require("business_id", &self.business_id)?;
        require("open_id", &self.open_id)?;

        let content = match self.kind.as_str() {
            "" | MessageContent::TEXT => {
                require("text", &self.text)?;
                MessageContent::text(self.text)
            }
            MessageContent::IMAGE => {
                require("url", &self.url)?;
                MessageContent::image(self.url)
            }
            MessageContent::PRODUCT_CARD => {
                require("product_id", &self.product_id)?;
                MessageContent::product(self.product_id)
            }
            MessageContent::ORDER_CARD => {
                require("order_id", &self.order_id)?;
                MessageContent::order(self.order_id)
            }
            MessageContent::COUPON_CARD => {
                require("coupon_id", &self.coupon_id)?;
                MessageContent::coupon(self.coupon_id)
            }
            MessageContent::RETURN_REFUND_CARD => {
                require("return_refund_id", &self.return_refund_id)?;
                MessageContent::return_refund(self.return_refund_id)
            }
            other => {
                return Err(RelayError::bad_request(format!(
                    "unsupported message type: {other}"
                )));
            }
        };
        Ok((self.business_id, self.open_id, content))
    }
}

fn require(field: &str, value: &str) -> Result<(), RelayError> {
    if value.is_empty() {
        Err(RelayError::bad_request(format!("{field} required")))
    } else {
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendAck {
    pub status: String,
}

impl SendAck {
    fn sent() -> Self {
        Self {
            status: "sent".into(),
        }
    }
}

pub async fn send_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SendAck>, RelayError> {
    let request: SendMessageRequest =
        serde_json::from_slice(&body).map_err(|err| RelayError::bad_request(err.to_string()))?;
    let (business_id, open_id, content) = request.into_content()?;
    tracing::info!(message_type = content.kind(), "forwarding message send");

    state
        .messaging
        .send(&business_id, &open_id, content)
        .await?;
    Ok(Json(SendAck::sent()))
}

pub async fn list_campaigns(
    State(state): State<AppState>,
    params: QueryParams,
) -> Result<Json<CampaignResponse>, RelayError> {
    let advertiser_id = params.value("advertiser_id");
    require("advertiser_id", &advertiser_id)?;
    let resp = state.marketing.get_campaigns(&advertiser_id).await?;
    Ok(Json(resp))
}

/// Report parameters; a repeated key keeps its first value.
#[derive(Debug, Default)]
pub struct ReportQuery {
    pub advertiser_id: String,
    pub report_type: String,
    pub dimension: String,
    pub start_date: String,
    pub end_date: String,
}

impl ReportQuery {
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            advertiser_id: params.value("advertiser_id"),
            report_type: params.value("report_type"),
            dimension: params.value("dimension"),
            start_date: params.value("start_date"),
            end_date: params.value("end_date"),
        }
    }

    fn is_complete(&self) -> bool {
        [
            &self.advertiser_id,
            &self.report_type,
            &self.dimension,
            &self.start_date,
            &self.end_date,
        ]
        .iter()
        .all(|value| !value.is_empty())
    }
}

pub async fn get_report(
    State(state): State<AppState>,
    params: QueryParams,
) -> Result<Json<ReportResponse>, RelayError> {
    let q = ReportQuery::from_params(&params);
    if !q.is_complete() {
        return Err(RelayError::bad_request("missing required query parameters"));
    }
    let resp = state
        .marketing
        .get_report(
            &q.advertiser_id,
            &q.report_type,
            &q.dimension,
            &q.start_date,
            &q.end_date,
        )
        .await?;
    Ok(Json(resp))
}
