//! Inbound webhook event model.
//!
//! ```text
//! {"object": "...", "entry": [{"id", "time", "messaging": [
//!     {"sender": {"id"}, "recipient": {"id"}, "message": {"mid", "type", <payload>}}
//! ]}]}
//! ```
//!
//! Decoding is lenient about absent fields but every struct position must be
//! a JSON object. A message whose `type` is not one of the known kinds still
//! decodes, as [`MessagePayload::Unknown`].

use std::fmt;
use std::marker::PhantomData;

use serde::de::value::MapAccessDeserializer;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::content::{
    CouponContent, ImageContent, MessageContent, OrderContent, ProductContent,
    ReturnRefundContent,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub object: String,
    #[serde(default, deserialize_with = "objects")]
    pub entry: Vec<Entry>,
}

impl WebhookEvent {
    /// Decodes a webhook body. Anything but a JSON object is an error.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice::<Object<Self>>(body).map(|Object(event)| event)
    }

    /// All messaging events in delivery order: entries first, then the
    /// events inside each entry.
    pub fn messaging_events(&self) -> impl Iterator<Item = &MessagingEvent> {
        self.entry.iter().flat_map(|entry| entry.messaging.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub time: i64,
    #[serde(default, deserialize_with = "objects")]
    pub messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingEvent {
    #[serde(default, deserialize_with = "object")]
    pub sender: Participant,
    #[serde(default, deserialize_with = "object")]
    pub recipient: Participant,
    #[serde(default, deserialize_with = "object")]
    pub message: Message,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawMessage", into = "RawMessage")]
pub struct Message {
    pub mid: String,
    pub payload: MessagePayload,
}

impl Message {
    pub fn kind(&self) -> &str {
        self.payload.kind()
    }
}

/// Payload of an inbound message, keyed by its `type`. A known type whose
/// payload object was absent carries `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePayload {
    Text(Option<String>),
    Image(Option<ImageContent>),
    ProductCard(Option<ProductContent>),
    OrderCard(Option<OrderContent>),
    CouponCard(Option<CouponContent>),
    ReturnRefundCard(Option<ReturnRefundContent>),
    Unknown(String),
}

impl Default for MessagePayload {
    fn default() -> Self {
        MessagePayload::Unknown(String::new())
    }
}

impl MessagePayload {
    pub fn kind(&self) -> &str {
        match self {
            MessagePayload::Text(_) => MessageContent::TEXT,
            MessagePayload::Image(_) => MessageContent::IMAGE,
            MessagePayload::ProductCard(_) => MessageContent::PRODUCT_CARD,
            MessagePayload::OrderCard(_) => MessageContent::ORDER_CARD,
            MessagePayload::CouponCard(_) => MessageContent::COUPON_CARD,
            MessagePayload::ReturnRefundCard(_) => MessageContent::RETURN_REFUND_CARD,
            MessagePayload::Unknown(kind) => kind.as_str(),
        }
    }

    /// Name and value of the payload field worth logging, if present.
    pub fn detail(&self) -> Option<(&'static str, &str)> {
        match self {
            MessagePayload::Text(text) => text.as_deref().map(|t| ("text", t)),
            MessagePayload::Image(image) => image.as_ref().map(|i| ("image_url", i.url.as_str())),
            MessagePayload::ProductCard(card) => {
                card.as_ref().map(|c| ("product_id", c.product_id.as_str()))
            }
            MessagePayload::OrderCard(card) => {
                card.as_ref().map(|c| ("order_id", c.order_id.as_str()))
            }
            MessagePayload::CouponCard(card) => {
                card.as_ref().map(|c| ("coupon_id", c.coupon_id.as_str()))
            }
            MessagePayload::ReturnRefundCard(card) => card
                .as_ref()
                .map(|c| ("return_refund_id", c.return_refund_id.as_str())),
            MessagePayload::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RawMessage {
    #[serde(default)]
    mid: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    image: Option<ImageContent>,
    #[serde(
        default,
        deserialize_with = "optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    product_card: Option<ProductContent>,
    #[serde(
        default,
        deserialize_with = "optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    order_card: Option<OrderContent>,
    #[serde(
        default,
        deserialize_with = "optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    coupon_card: Option<CouponContent>,
    #[serde(
        default,
        deserialize_with = "optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    return_refund_card: Option<ReturnRefundContent>,
}

impl From<RawMessage> for Message {
    fn from(raw: RawMessage) -> Self {
        let payload = match raw.kind.as_str() {
            MessageContent::TEXT => MessagePayload::Text(raw.text),
            MessageContent::IMAGE => MessagePayload::Image(raw.image),
            MessageContent::PRODUCT_CARD => MessagePayload::ProductCard(raw.product_card),
            MessageContent::ORDER_CARD => MessagePayload::OrderCard(raw.order_card),
            MessageContent::COUPON_CARD => MessagePayload::CouponCard(raw.coupon_card),
            MessageContent::RETURN_REFUND_CARD => {
                MessagePayload::ReturnRefundCard(raw.return_refund_card)
            }
            _ => MessagePayload::Unknown(raw.kind),
        };
        Message {
            mid: raw.mid,
            payload,
        }
    }
}

impl From<Message> for RawMessage {
    fn from(message: Message) -> Self {
        let mut raw = RawMessage {
            mid: message.mid,
            kind: message.payload.kind().to_string(),
            ..Default::default()
        };
        match message.payload {
            MessagePayload::Text(text) => raw.text = text,
            MessagePayload::Image(image) => raw.image = image,
            MessagePayload::ProductCard(card) => raw.product_card = card,
            MessagePayload::OrderCard(card) => raw.order_card = card,
            MessagePayload::CouponCard(card) => raw.coupon_card = card,
            MessagePayload::ReturnRefundCard(card) => raw.return_refund_card = card,
            MessagePayload::Unknown(_) => {}
        }
        raw
    }
}

/// Derived struct impls also accept a JSON array in place of an object;
/// this wrapper only takes a map.
struct Object<T>(T);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Object<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ObjectVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for ObjectVisitor<T> {
            type Value = T;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<T, A::Error> {
                T::deserialize(MapAccessDeserializer::new(map))
            }
        }

        deserializer
            .deserialize_map(ObjectVisitor(PhantomData))
            .map(Object)
    }
}

fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Object::deserialize(deserializer).map(|Object(value)| value)
}

fn objects<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Vec::<Object<T>>::deserialize(deserializer)?;
    Ok(items.into_iter().map(|Object(value)| value).collect())
}

fn optional_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Object<T>>::deserialize(deserializer).map(|value| value.map(|Object(v)| v))
}
