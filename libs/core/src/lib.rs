//! Core building blocks of the TikTok business messaging relay: the
//! process configuration, the outbound messaging and marketing API clients,
//! and the inbound webhook event model.

pub mod config;
pub mod content;
pub mod error;
pub mod marketing;
pub mod messaging;
pub mod webhook;

pub use config::Config;
pub use content::{
    CouponContent, ImageContent, MessageContent, OrderContent, ProductContent,
    ReturnRefundContent,
};
pub use error::ApiError;
pub use marketing::{
    Campaign, CampaignData, CampaignResponse, Envelope, MarketingClient, PageInfo, ReportData,
    ReportResponse, ReportRow,
};
pub use messaging::{MessageRequest, MessagingClient, Recipient};
pub use webhook::{Entry, Message, MessagePayload, MessagingEvent, Participant, WebhookEvent};

/// Platform label attached to logs and counters.
pub const PLATFORM: &str = "tiktok";
