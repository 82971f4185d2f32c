//! Trading session: one wallet trading against one config snapshot.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use chrono::Duration;
use rust_decimal::Decimal;
use tracing::info;

use crate::amount::AmountEncoder;
use crate::clock::{Clock, SystemClock};
use crate::config::{ExchangeConfig, OrderSettings};
use crate::signing::{OrderBuilder, OrderSigner, RequestAuthenticator, SignedOrder, Wallet};
use crate::types::{AuthPayload, Market, OrderRequest, TradeIntent, EXCHANGE_LIMIT};
use crate::{Error, Result};

/// Holds everything needed to produce signed orders and authenticated
/// read requests.
///
/// The config is an immutable snapshot; swapping it via
/// [`TradingSession::replace_config`] never affects a build in progress.
#[derive(Debug)]
pub struct TradingSession {
    config: Arc<ExchangeConfig>,
    settings: OrderSettings,
    signer: OrderSigner,
    clock: Arc<dyn Clock>,
    authenticator: RequestAuthenticator,
}

impl TradingSession {
    /// Create a session on the system clock.
    pub fn new(config: ExchangeConfig, settings: OrderSettings, wallet: Wallet) -> Result<Self> {
        Self::with_clock(config, settings, wallet, Arc::new(SystemClock))
    }

    /// Create a session on a caller-supplied clock.
    pub fn with_clock(
        config: ExchangeConfig,
        settings: OrderSettings,
        wallet: Wallet,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        settings.validate()?;

        info!(
            address = %wallet.address(),
            exchange = %config.exchange_address,
            tokens = config.token_registry.len(),
            "Trading session ready"
        );

        Ok(Self {
            config: Arc::new(config),
            authenticator: RequestAuthenticator::new(&settings),
            settings,
            signer: OrderSigner::new(wallet),
            clock,
        })
    }

    pub fn config(&self) -> Arc<ExchangeConfig> {
        Arc::clone(&self.config)
    }

    pub fn settings(&self) -> &OrderSettings {
        &self.settings
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Swap in a freshly fetched config snapshot.
    pub fn replace_config(&mut self, config: ExchangeConfig) {
        self.config = Arc::new(config);
    }

    /// Trade intent for `symbol` using the default order lifetime.
    pub fn intent(&self, symbol: &str, amount: Decimal, price: Decimal) -> Result<TradeIntent> {
        let market: Market = symbol.parse()?;
        let ttl_secs = self.settings.default_ttl_secs;
        let ttl = Duration::try_seconds(ttl_secs).ok_or(Error::InvalidTtl { ttl_secs })?;

        Ok(TradeIntent::new(market, amount, price, ttl))
    }

    /// Encode, build and sign an order for `intent`.
    pub fn create_signed_order(
        &self,
        intent: &TradeIntent,
        salt: Option<U256>,
    ) -> Result<SignedOrder> {
        let config = Arc::clone(&self.config);

        let encoded = AmountEncoder::new(&config, &self.settings).encode_intent(intent)?;

        let mut builder = OrderBuilder::new(&config, self.clock.as_ref());
        if let Some(salt) = salt {
            builder = builder.with_salt(salt);
        }
        let order = builder.build(intent, encoded, self.signer.address())?;

        self.signer.sign_order(order)
    }

    /// Produce the full order submission for `intent`.
    pub fn create_order(&self, intent: &TradeIntent) -> Result<OrderRequest> {
        let signed = self.create_signed_order(intent, None)?;
        self.wrap(intent, &signed)
    }

    /// Wrap a signed order in the submission envelope.
    pub fn wrap(&self, intent: &TradeIntent, signed: &SignedOrder) -> Result<OrderRequest> {
        let cid = self.clock.unix_millis()?;

        info!(
            symbol = %intent.market,
            amount = %intent.amount,
            price = %intent.price,
            cid,
            "Created order"
        );

        Ok(OrderRequest {
            gid: self.settings.group_id,
            cid,
            order_type: EXCHANGE_LIMIT.to_string(),
            symbol: intent.market.symbol(),
            amount: intent.amount,
            price: intent.price,
            meta: signed.to_meta(),
            protocol: self.settings.protocol.clone(),
            partner_id: self.settings.partner_id.clone(),
            fee_rate: self.settings.fee_rate,
        })
    }

    /// Authentication payload for the order history endpoint.
    pub fn historical_orders_auth(&self) -> Result<AuthPayload> {
        self.authenticator
            .authenticate(self.clock.as_ref(), self.signer.wallet())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::TokenInfo;
    use crate::signing::signed_message_digest;
    use rust_decimal_macros::dec;

    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_config() -> ExchangeConfig {
        ExchangeConfig::new(Address::repeat_byte(0x22), Address::repeat_byte(0x11))
            .with_token(
                "ETH",
                TokenInfo {
                    decimals: 18,
                    settle_spread: Decimal::ZERO,
                    wrapper_address: Address::repeat_byte(0xe1),
                },
            )
            .with_token(
                "USD",
                TokenInfo {
                    decimals: 2,
                    settle_spread: dec!(0.001),
                    wrapper_address: Address::repeat_byte(0xd1),
                },
            )
    }

    fn test_session() -> TradingSession {
        TradingSession::with_clock(
            test_config(),
            OrderSettings::default(),
            Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap(),
            Arc::new(FixedClock::at_unix(1_700_000_000)),
        )
        .unwrap()
    }

    #[test]
    fn test_intent_uses_default_ttl() {
        let session = test_session();
        let intent = session.intent("tETHUSD", dec!(-0.1), dec!(1000)).unwrap();

        assert_eq!(intent.market, Market::new("ETH", "USD"));
        assert_eq!(intent.ttl, Duration::seconds(3600));
    }

    #[test]
    fn test_intent_rejects_unrepresentable_ttl() {
        let mut session = test_session();
        session.settings.default_ttl_secs = i64::MAX;

        let result = session.intent("tETHUSD", dec!(1), dec!(1));
        assert!(matches!(
            result,
            Err(Error::InvalidTtl { ttl_secs: i64::MAX })
        ));
    }

    #[test]
    fn test_session_rejects_bad_default_ttl() {
        for ttl_secs in [0, -60, i64::MAX] {
            let settings = OrderSettings {
                default_ttl_secs: ttl_secs,
                ..Default::default()
            };
            let result = TradingSession::with_clock(
                test_config(),
                settings,
                Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap(),
                Arc::new(FixedClock::at_unix(1_700_000_000)),
            );
            assert!(matches!(result, Err(Error::Config { .. })), "{ttl_secs}");
        }
    }

    #[test]
    fn test_intent_rejects_bad_symbol() {
        let session = test_session();
        let result = session.intent("ETHUSD", dec!(1), dec!(1000));
        assert!(matches!(result, Err(Error::InvalidMarket(_))));
    }

    #[test]
    fn test_create_order_envelope() {
        let session = test_session();
        let intent = session.intent("tETHUSD", dec!(-0.1), dec!(1000)).unwrap();

        let request = session.create_order(&intent).unwrap();

        assert_eq!(request.gid, 1);
        assert_eq!(request.cid, 1_700_000_000_000);
        assert_eq!(request.order_type, "EXCHANGE LIMIT");
        assert_eq!(request.symbol, "tETHUSD");
        assert_eq!(request.amount, dec!(-0.1));
        assert_eq!(request.price, dec!(1000));
        assert_eq!(request.protocol, "0x");
        assert_eq!(request.partner_id, None);
        assert_eq!(request.fee_rate, dec!(0.0025));

        let meta = &request.meta;
        assert_eq!(meta.maker_asset_amount, "100000000000000000");
        assert_eq!(meta.taker_asset_amount, "9984");
        assert_eq!(meta.expiration_time_seconds, "1700003600");
        assert_eq!(meta.maker_fee, "0");
        assert_eq!(meta.taker_fee, "0");
    }

    #[test]
    fn test_created_order_verifies() {
        let session = test_session();
        let intent = session.intent("tETHUSD", dec!(0.5), dec!(1200)).unwrap();

        let request = session.create_order(&intent).unwrap();
        let signed = SignedOrder::from_meta(&request.meta).unwrap();

        assert_eq!(signed.recover_signer().unwrap(), session.address());
        assert!(signed.is_signed_by_maker());
    }

    #[test]
    fn test_fixed_salt_is_deterministic() {
        let session = test_session();
        let intent = session.intent("tETHUSD", dec!(-0.1), dec!(1000)).unwrap();
        let salt = U256::from(42u64);

        let first = session.create_signed_order(&intent, Some(salt)).unwrap();
        let second = session.create_signed_order(&intent, Some(salt)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.order().salt, salt);
    }

    #[test]
    fn test_failed_encoding_produces_nothing() {
        let session = test_session();

        let zero = session.intent("tETHUSD", Decimal::ZERO, dec!(1000)).unwrap();
        assert!(matches!(
            session.create_order(&zero),
            Err(Error::InvalidAmount { .. })
        ));

        let unknown = session.intent("tBTCUSD", dec!(1), dec!(1000)).unwrap();
        assert!(matches!(
            session.create_order(&unknown),
            Err(Error::UnknownToken { .. })
        ));

        let mut expired = session.intent("tETHUSD", dec!(1), dec!(1000)).unwrap();
        expired.ttl = Duration::seconds(-5);
        assert!(matches!(
            session.create_order(&expired),
            Err(Error::InvalidTtl { ttl_secs: -5 })
        ));
    }

    #[test]
    fn test_historical_orders_auth() {
        let session = test_session();

        let first = session.historical_orders_auth().unwrap();
        let second = session.historical_orders_auth().unwrap();

        assert_eq!(first.nonce, "1700000030");
        assert_eq!(second.nonce, "1700000031");
        assert_eq!(first.protocol, "0x");
        assert_ne!(
            signed_message_digest(first.nonce.as_bytes()),
            signed_message_digest(second.nonce.as_bytes())
        );
    }

    #[test]
    fn test_replace_config_keeps_old_snapshot() {
        let mut session = test_session();
        let snapshot = session.config();

        session.replace_config(ExchangeConfig::new(Address::ZERO, Address::ZERO));

        assert_eq!(snapshot.exchange_address, Address::repeat_byte(0x22));
        assert!(session.config().token_registry.is_empty());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = OrderSettings {
            fee_rate: dec!(1),
            ..Default::default()
        };
        let result = TradingSession::with_clock(
            test_config(),
            settings,
            Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap(),
            Arc::new(FixedClock::at_unix(1_700_000_000)),
        );
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
