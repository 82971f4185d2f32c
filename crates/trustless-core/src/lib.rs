//! Trustless Core Library
//!
//! Exact amount encoding, 0x v2 order hashing and signing, and nonce-based
//! request authentication for the Trustless exchange.

pub mod amount;
pub mod clock;
pub mod config;
pub mod error;
pub mod session;
pub mod signing;
pub mod types;

pub use amount::{encode_amounts, AmountEncoder, EncodedAmounts};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ExchangeConfig, OrderSettings, TokenInfo};
pub use error::{Error, Result};
pub use session::TradingSession;
