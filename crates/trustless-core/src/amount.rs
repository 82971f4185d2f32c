//! Conversion of human trade quantities into base-unit integers.
//!
//! Every amount is the floor of an exact rational product. Decimal inputs
//! are turned into integer ratios (`mantissa / 10^scale`) and multiplied in
//! 512-bit arithmetic, so nothing is rounded until the single final floor.
//!
//! The order of factors is fixed: settle spread, then fee, then floor.

use alloy_primitives::{U256, U512};
use rust_decimal::Decimal;

use crate::config::{ExchangeConfig, OrderSettings, TokenInfo};
use crate::types::{Side, TradeIntent};
use crate::{Error, Result};

/// Amounts in base units for both sides of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedAmounts {
    /// What the maker gives (`makerAssetAmount`).
    pub give_amount: U256,
    /// What the maker receives (`takerAssetAmount`).
    pub receive_amount: U256,
}

/// Encodes amounts against a config snapshot and the client's settings.
#[derive(Debug, Clone, Copy)]
pub struct AmountEncoder<'a> {
    config: &'a ExchangeConfig,
    settings: &'a OrderSettings,
}

impl<'a> AmountEncoder<'a> {
    pub fn new(config: &'a ExchangeConfig, settings: &'a OrderSettings) -> Self {
        Self { config, settings }
    }

    /// Encode a trade that gives `give_symbol` and is priced in
    /// `receive_symbol`.
    ///
    /// The receive side carries price, spread and fee; the give side is the
    /// plain quantity.
    pub fn encode(
        &self,
        amount: Decimal,
        price: Decimal,
        give_symbol: &str,
        receive_symbol: &str,
    ) -> Result<EncodedAmounts> {
        let give = self.config.token_of(give_symbol)?;
        let receive = self.config.token_of(receive_symbol)?;
        let spread = self.spread_for(receive_symbol, receive);

        encode_amounts(amount, price, give, receive, spread, self.settings.fee_rate)
    }

    /// Encode a trade intent, picking the direction from the amount's sign.
    ///
    /// Sells go through [`AmountEncoder::encode`] directly. Buys give the
    /// quote currency (price and spread applied) and receive the base asset
    /// net of fees.
    pub fn encode_intent(&self, intent: &TradeIntent) -> Result<EncodedAmounts> {
        let market = &intent.market;

        match intent.side() {
            None => Err(Error::invalid_amount("amount must be non-zero")),
            Some(Side::Sell) => self.encode(intent.amount, intent.price, &market.base, &market.quote),
            Some(Side::Buy) => {
                check_inputs(intent.amount, intent.price, self.settings.fee_rate)?;

                let base = self.config.token_of(&market.base)?;
                let quote = self.config.token_of(&market.quote)?;
                let spread = self.spread_for(&market.quote, quote);
                let quantity = intent.amount.abs();

                let give_amount = Ratio::base_units(quote.decimals)?
                    .times(quantity)?
                    .times(intent.price)?
                    .times(spread_factor(spread)?)?
                    .floor()?;
                let receive_amount = Ratio::base_units(base.decimals)?
                    .times(quantity)?
                    .times(fee_factor(self.settings.fee_rate))?
                    .floor()?;

                Ok(EncodedAmounts {
                    give_amount,
                    receive_amount,
                })
            }
        }
    }

    fn spread_for(&self, symbol: &str, token: &TokenInfo) -> Option<Decimal> {
        self.settings
            .is_spread_quote(symbol)
            .then_some(token.settle_spread)
    }
}

/// Encode amounts from explicit token metadata.
///
/// ```text
/// receive = floor(10^receive.decimals * |amount| * price * (1 + spread) * (1 - fee_rate))
/// give    = floor(10^give.decimals * |amount|)
/// ```
pub fn encode_amounts(
    amount: Decimal,
    price: Decimal,
    give: &TokenInfo,
    receive: &TokenInfo,
    settle_spread: Option<Decimal>,
    fee_rate: Decimal,
) -> Result<EncodedAmounts> {
    check_inputs(amount, price, fee_rate)?;
    let quantity = amount.abs();

    let receive_amount = Ratio::base_units(receive.decimals)?
        .times(quantity)?
        .times(price)?
        .times(spread_factor(settle_spread)?)?
        .times(fee_factor(fee_rate))?
        .floor()?;
    let give_amount = Ratio::base_units(give.decimals)?.times(quantity)?.floor()?;

    Ok(EncodedAmounts {
        give_amount,
        receive_amount,
    })
}

fn check_inputs(amount: Decimal, price: Decimal, fee_rate: Decimal) -> Result<()> {
    if amount.is_zero() {
        return Err(Error::invalid_amount("amount must be non-zero"));
    }
    if price.is_sign_negative() || price.is_zero() {
        return Err(Error::invalid_amount(format!("price must be positive, got {price}")));
    }
    if fee_rate.is_sign_negative() || fee_rate >= Decimal::ONE {
        return Err(Error::invalid_amount(format!(
            "fee rate must be in [0, 1), got {fee_rate}"
        )));
    }
    Ok(())
}

fn spread_factor(settle_spread: Option<Decimal>) -> Result<Decimal> {
    let spread = settle_spread.unwrap_or(Decimal::ZERO);
    match Decimal::ONE.checked_add(spread) {
        Some(factor) if factor > Decimal::ZERO => Ok(factor),
        _ => Err(Error::invalid_amount(format!(
            "settle spread {spread} leaves no positive price"
        ))),
    }
}

// Range already checked, `1 - fee` is in (0, 1].
fn fee_factor(fee_rate: Decimal) -> Decimal {
    Decimal::ONE - fee_rate
}

/// Non-negative rational `num / den`.
#[derive(Debug, Clone, Copy)]
struct Ratio {
    num: U512,
    den: U512,
}

impl Ratio {
    /// `10^decimals / 1`.
    fn base_units(decimals: u8) -> Result<Self> {
        Ok(Self {
            num: pow10(u32::from(decimals))?,
            den: U512::from(1u64),
        })
    }

    fn times(self, factor: Decimal) -> Result<Self> {
        if factor.is_sign_negative() && !factor.is_zero() {
            return Err(Error::invalid_amount(format!(
                "negative factor {factor} in amount computation"
            )));
        }

        let factor = factor.normalize();
        let mantissa = U512::from(factor.mantissa().unsigned_abs());

        Ok(Self {
            num: self.num.checked_mul(mantissa).ok_or_else(overflow)?,
            den: self.den.checked_mul(pow10(factor.scale())?).ok_or_else(overflow)?,
        })
    }

    fn floor(self) -> Result<U256> {
        let quotient = self.num / self.den;
        if quotient.bit_len() > 256 {
            return Err(overflow());
        }

        let bytes = quotient.to_be_bytes_vec();
        Ok(U256::from_be_slice(&bytes[bytes.len() - 32..]))
    }
}

fn pow10(exp: u32) -> Result<U512> {
    U512::from(10u64)
        .checked_pow(U512::from(exp))
        .ok_or_else(overflow)
}

fn overflow() -> Error {
    Error::invalid_amount("amount exceeds 256-bit range")
}
