//! Exchange configuration snapshot and client-side order settings.
//!
//! [`ExchangeConfig`] is the typed form of the exchange's `get/conf`
//! response. It is read-only: a snapshot is loaded once and shared behind an
//! `Arc` for as long as orders are being built against it.
//!
//! [`OrderSettings`] carries the client-side constants (protocol tag, fee
//! rate, nonce bias, ...) that get passed explicitly into the encoders and
//! signers.

use std::collections::HashMap;

use alloy_primitives::Address;
use chrono::Duration;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{Error, Result};

/// Protocol tag sent with every order and authenticated request.
pub const PROTOCOL_TAG: &str = "0x";

/// Key of the 0x section in the exchange configuration response.
const ZERO_X_SECTION: &str = "0x";

/// Trading fee deducted from the amount the maker receives (0.25%).
pub const DEFAULT_FEE_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 4);

/// Seconds added to the clock when deriving a request nonce.
pub const DEFAULT_NONCE_BIAS_SECS: u64 = 30;

/// Default order lifetime (one hour).
pub const DEFAULT_ORDER_TTL_SECS: i64 = 60 * 60;

/// Registry entry for a tradable token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    /// Decimal places of the token's base unit.
    pub decimals: u8,
    /// Price adjustment for fiat-pegged quote currencies.
    #[serde(default)]
    pub settle_spread: Decimal,
    /// Address of the wrapper token contract settled on-chain.
    pub wrapper_address: Address,
}

/// Immutable snapshot of the exchange configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeConfig {
    pub token_registry: HashMap<String, TokenInfo>,
    /// 0x exchange contract, also the EIP-712 verifying contract.
    pub exchange_address: Address,
    /// Operator address: fee recipient and sender of every order.
    #[serde(rename = "ethfinexAddress")]
    pub operator_address: Address,
}

impl ExchangeConfig {
    /// Create an empty snapshot for the given exchange and operator.
    pub fn new(exchange_address: Address, operator_address: Address) -> Self {
        Self {
            token_registry: HashMap::new(),
            exchange_address,
            operator_address,
        }
    }

    /// Add a token to the registry.
    pub fn with_token(mut self, symbol: impl Into<String>, token: TokenInfo) -> Self {
        self.token_registry.insert(symbol.into(), token);
        self
    }

    /// Parse a configuration response.
    ///
    /// Accepts either the full response (with its `"0x"` section) or the
    /// section on its own.
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut value: serde_json::Value = serde_json::from_str(raw)?;

        if let Some(section) = value
            .as_object_mut()
            .and_then(|obj| obj.remove(ZERO_X_SECTION))
        {
            return Ok(serde_json::from_value(section)?);
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Look up a token by symbol.
    pub fn token_of(&self, symbol: &str) -> Result<&TokenInfo> {
        self.token_registry
            .get(symbol)
            .ok_or_else(|| Error::UnknownToken {
                symbol: symbol.to_string(),
            })
    }
}

/// Client-side constants for order construction and request signing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrderSettings {
    /// Fee rate in `[0, 1)`.
    pub fee_rate: Decimal,
    pub protocol: String,
    /// Group id (`gid`) attached to submitted orders.
    pub group_id: u64,
    pub partner_id: Option<String>,
    pub default_ttl_secs: i64,
    pub nonce_bias_secs: u64,
    /// Quote currencies whose settle spread is applied.
    pub spread_quotes: Vec<String>,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            fee_rate: DEFAULT_FEE_RATE,
            protocol: PROTOCOL_TAG.to_string(),
            group_id: 1,
            partner_id: None,
            default_ttl_secs: DEFAULT_ORDER_TTL_SECS,
            nonce_bias_secs: DEFAULT_NONCE_BIAS_SECS,
            spread_quotes: vec!["USD".to_string()],
        }
    }
}

impl OrderSettings {
    /// Load settings from an optional `trustless.toml` and `TRUSTLESS_*`
    /// environment variables, on top of the defaults.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("trustless").required(false))
            .add_source(
                config::Environment::with_prefix("TRUSTLESS")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("spread_quotes"),
            )
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the invariants the encoders rely on.
    pub fn validate(&self) -> Result<()> {
        if self.fee_rate.is_sign_negative() || self.fee_rate >= Decimal::ONE {
            return Err(Error::Config {
                message: format!("fee_rate must be in [0, 1), got {}", self.fee_rate),
            });
        }
        if self.protocol.is_empty() {
            return Err(Error::Config {
                message: "protocol tag must not be empty".to_string(),
            });
        }
        if self.default_ttl_secs <= 0 || Duration::try_seconds(self.default_ttl_secs).is_none() {
            return Err(Error::Config {
                message: format!(
                    "default_ttl_secs must be a positive duration, got {}",
                    self.default_ttl_secs
                ),
            });
        }
        Ok(())
    }

    /// Whether the settle spread applies when `symbol` is the quote currency.
    pub fn is_spread_quote(&self, symbol: &str) -> bool {
        self.spread_quotes.iter().any(|quote| quote == symbol)
    }
}
