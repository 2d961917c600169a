use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tbm_telemetry::{TelemetryLabels, record_counter};

use crate::PLATFORM;
use crate::config::Config;
use crate::error::ApiError;

const CAMPAIGN_PATH: &str = "campaign/get/";
const REPORT_PATH: &str = "report/integrated/get/";
const OUTBOUND_COUNTER: &str = "tbm_outbound_requests_total";

/// Reports are always requested at auction level.
pub const REPORT_DATA_LEVEL: &str = "AUCTION";

/// Metrics requested for every report.
pub const REPORT_METRICS: [&str; 7] = [
    "spend",
    "impressions",
    "clicks",
    "cpc",
    "cpm",
    "ctr",
    "conversion",
];

/// Response wrapper used by the marketing API family. A non-zero `code`
/// means the call failed, whatever the HTTP status was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: T,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageInfo {
    pub page: i64,
    pub page_size: i64,
    pub total_number: i64,
    pub total_page: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Campaign {
    pub campaign_id: String,
    pub campaign_name: String,
    pub objective: String,
    pub budget: f64,
    pub budget_mode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignData {
    pub list: Vec<Campaign>,
    pub page_info: PageInfo,
}

/// Report rows are schema-less: their keys depend on the requested
/// dimensions and metrics. Key order follows the remote response.
pub type ReportRow = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportData {
    pub list: Vec<ReportRow>,
    pub page_info: PageInfo,
}

pub type CampaignResponse = Envelope<CampaignData>;
pub type ReportResponse = Envelope<ReportData>;

/// Read-only client for campaign listings and integrated reports. Only the
/// first page is fetched; `page_info` is returned for manual follow-up.
#[derive(Clone)]
pub struct MarketingClient {
    http: reqwest::Client,
    config: Arc<Config>,
    api_base: String,
}

impl MarketingClient {
    pub fn new(http: reqwest::Client, config: Arc<Config>) -> Self {
        let api_base = config.marketing_api_base.trim_end_matches('/').to_string();
        Self {
            http,
            config,
            api_base,
        }
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    pub async fn get_campaigns(&self, advertiser_id: &str) -> Result<CampaignResponse, ApiError> {
        let query = [("advertiser_id", advertiser_id.to_string())];
        self.get("campaign.get", CAMPAIGN_PATH, &query).await
    }

    /// `report_type` is e.g. `BASIC` or `AUDIENCE`; `dimension` is e.g.
    /// `campaign_id` or `adgroup_id`.
    pub async fn get_report(
        &self,
        advertiser_id: &str,
        report_type: &str,
        dimension: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<ReportResponse, ApiError> {
        let query = report_query(advertiser_id, report_type, dimension, start_date, end_date);
        self.get("report.integrated.get", REPORT_PATH, &query).await
    }

    async fn get<T>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        let labels = TelemetryLabels::new(PLATFORM).with_endpoint(endpoint);
        let result = self.fetch(path, query).await;
        match &result {
            Ok(_) => record_counter(OUTBOUND_COUNTER, 1, &labels.with_outcome("ok")),
            Err(err) => {
                tracing::warn!(endpoint, error = %err, "tiktok marketing call failed");
                record_counter(OUTBOUND_COUNTER, 1, &labels.with_outcome(err.kind()));
            }
        }
        result
    }

    async fn fetch<T>(&self, path: &str, query: &[(&str, String)]) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        let envelope: Envelope<T> = self
            .http
            .get(self.build_url(path))
            .query(query)
            .header("Access-Token", &self.config.access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?
            .json()
            .await?;

        if envelope.code != 0 {
            return Err(ApiError::Remote {
                code: envelope.code,
                message: envelope.message,
            });
        }
        Ok(envelope)
    }
}

fn report_query(
    advertiser_id: &str,
    report_type: &str,
    dimension: &str,
    start_date: &str,
    end_date: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("advertiser_id", advertiser_id.to_string()),
        ("report_type", report_type.to_string()),
        ("data_level", REPORT_DATA_LEVEL.to_string()),
        ("dimensions", json_array(&[dimension])),
        ("start_date", start_date.to_string()),
        ("end_date", end_date.to_string()),
        ("metrics", json_array(&REPORT_METRICS)),
    ]
}

fn json_array(items: &[&str]) -> String {
    Value::from(items.to_vec()).to_string()
}
