//! JSON shapes exchanged with the Trustless API.
//!
//! These are the outbound order envelope and the authenticated request
//! payload. Integers inside `meta` are decimal strings and addresses are
//! lowercase `0x` hex, as the 0x v2 tooling produces them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order type sent for every limit order.
pub const EXCHANGE_LIMIT: &str = "EXCHANGE LIMIT";

/// Endpoint paths, relative to the API base URL. All are `POST` with
/// `Accept: application/json` and `Content-Type: application/json`.
pub mod endpoints {
    /// Exchange configuration (token registry, contract addresses).
    pub const CONFIG: &str = "/trustless/v1/r/get/conf";
    /// Order submission, takes an [`OrderRequest`](super::OrderRequest).
    pub const SUBMIT_ORDER: &str = "/trustless/v1/w/on";
    /// Order history, takes an [`AuthPayload`](super::AuthPayload).
    pub const ORDER_HISTORY: &str = "/trustless/v1/r/orders/hist";
}

/// 0x v2 order message as carried in `OrderRequest::meta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMeta {
    pub maker_address: String,
    pub taker_address: String,
    pub fee_recipient_address: String,
    pub sender_address: String,
    pub maker_asset_amount: String,
    pub taker_asset_amount: String,
    pub maker_fee: String,
    pub taker_fee: String,
    pub expiration_time_seconds: String,
    pub salt: String,
    pub maker_asset_data: String,
    pub taker_asset_data: String,
    pub exchange_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Order submission envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Group id.
    pub gid: u64,
    /// Client id, milliseconds since the epoch at build time.
    pub cid: u64,
    #[serde(rename = "type")]
    pub order_type: String,
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub meta: OrderMeta,
    pub protocol: String,
    pub partner_id: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee_rate: Decimal,
}

/// Signed nonce proving wallet ownership on read endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub nonce: String,
    pub protocol: String,
    pub signature: String,
}
