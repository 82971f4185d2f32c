//! Signing module for Trustless 0x orders and read requests.
//!
//! Orders are hashed per EIP-712 under the 0x v2 exchange domain and signed
//! with the trader's wallet. Read endpoints are authenticated separately by
//! signing a time-based nonce as an EIP-191 personal message.
//!
//! # Architecture
//!
//! ```text
//! TradeIntent ── AmountEncoder ──► EncodedAmounts
//!                                        │
//!                                        ▼
//!                                  OrderBuilder ──► Order
//!                                                     │
//!                                     OrderSigner ◄───┘
//!                                         │
//!                                         ▼
//!                                    SignedOrder ──► OrderMeta (wire)
//!
//! Wallet ── RequestAuthenticator ──► AuthPayload (read endpoints)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use trustless_core::signing::{OrderBuilder, OrderSigner, Wallet};
//! use trustless_core::{AmountEncoder, SystemClock};
//!
//! let signer = OrderSigner::new(Wallet::from_env()?);
//! let encoded = AmountEncoder::new(&config, &settings).encode_intent(&intent)?;
//! let order = OrderBuilder::new(&config, &SystemClock).build(&intent, encoded, signer.address())?;
//! let signed = signer.sign_order(order)?;
//! let meta = signed.to_meta();
//! ```

pub mod domain;
pub mod order_types;
pub mod request_auth;
pub mod signer;

pub use domain::{typed_data_hash, ExchangeDomain, SignatureType, ERC20_PROXY_ID};

pub use order_types::{digest_meta, erc20_asset_data, Order, OrderBuilder, SignedOrder};

pub use request_auth::{
    authenticate, format_auth_signature, nonce_from_clock, signed_message_digest, NonceIssuer,
    RequestAuthenticator,
};

pub use signer::{sign, OrderSignature, OrderSigner, Wallet};
