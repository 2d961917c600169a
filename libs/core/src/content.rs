//! Message content shared by outbound sends and inbound webhook messages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContent {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductContent {
    pub product_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderContent {
    pub order_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponContent {
    pub coupon_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnRefundContent {
    pub return_refund_id: String,
}

/// Outbound message body. The `type` tag always names the one payload field
/// that is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: String },
    Image { image: ImageContent },
    ProductCard { product_card: ProductContent },
    OrderCard { order_card: OrderContent },
    CouponCard { coupon_card: CouponContent },
    ReturnRefundCard { return_refund_card: ReturnRefundContent },
}

impl MessageContent {
    pub const TEXT: &'static str = "text";
    pub const IMAGE: &'static str = "image";
    pub const PRODUCT_CARD: &'static str = "product_card";
    pub const ORDER_CARD: &'static str = "order_card";
    pub const COUPON_CARD: &'static str = "coupon_card";
    pub const RETURN_REFUND_CARD: &'static str = "return_refund_card";

    pub fn text(text: impl Into<String>) -> Self {
        MessageContent::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        MessageContent::Image {
            image: ImageContent { url: url.into() },
        }
    }

    pub fn product(product_id: impl Into<String>) -> Self {
        MessageContent::ProductCard {
            product_card: ProductContent {
                product_id: product_id.into(),
            },
        }
    }

    pub fn order(order_id: impl Into<String>) -> Self {
        MessageContent::OrderCard {
            order_card: OrderContent {
                order_id: order_id.into(),
            },
        }
    }

    pub fn coupon(coupon_id: impl Into<String>) -> Self {
        MessageContent::CouponCard {
            coupon_card: CouponContent {
                coupon_id: coupon_id.into(),
            },
        }
    }

    pub fn return_refund(return_refund_id: impl Into<String>) -> Self {
        MessageContent::ReturnRefundCard {
            return_refund_card: ReturnRefundContent {
                return_refund_id: return_refund_id.into(),
            },
        }
    }

    /// Wire value of the `type` discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            MessageContent::Text { .. } => Self::TEXT,
            MessageContent::Image { .. } => Self::IMAGE,
            MessageContent::ProductCard { .. } => Self::PRODUCT_CARD,
            MessageContent::OrderCard { .. } => Self::ORDER_CARD,
            MessageContent::CouponCard { .. } => Self::COUPON_CARD,
            MessageContent::ReturnRefundCard { .. } => Self::RETURN_REFUND_CARD,
        }
    }

    /// The single payload value carried by this message.
    pub fn value(&self) -> &str {
        match self {
            MessageContent::Text { text } => text,
            MessageContent::Image { image } => &image.url,
            MessageContent::ProductCard { product_card } => &product_card.product_id,
            MessageContent::OrderCard { order_card } => &order_card.order_id,
            MessageContent::CouponCard { coupon_card } => &coupon_card.coupon_id,
            MessageContent::ReturnRefundCard { return_refund_card } => {
                &return_refund_card.return_refund_id
            }
        }
    }
}
