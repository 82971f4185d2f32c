//! Market symbols and trade intents.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Length of the quote currency in compact symbols such as `tETHUSD`.
const QUOTE_LEN: usize = 3;

/// A trading pair, e.g. `tETHUSD` (base `ETH`, quote `USD`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Market {
    pub base: String,
    pub quote: String,
}

impl Market {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    /// Exchange symbol for this pair.
    pub fn symbol(&self) -> String {
        if self.quote.len() == QUOTE_LEN {
            format!("t{}{}", self.base, self.quote)
        } else {
            format!("t{}:{}", self.base, self.quote)
        }
    }
}

impl FromStr for Market {
    type Err = Error;

    /// Parse `tBASEQUOTE` (three-letter quote) or `tBASE:QUOTE`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMarket(s.to_string());

        let pair = s.strip_prefix('t').ok_or_else(invalid)?;
        if !pair.chars().all(|c| c.is_ascii_alphanumeric() || c == ':') {
            return Err(invalid());
        }

        let (base, quote) = match pair.split_once(':') {
            Some(split) => split,
            None if pair.len() > QUOTE_LEN => pair.split_at(pair.len() - QUOTE_LEN),
            None => return Err(invalid()),
        };

        if base.is_empty() || quote.is_empty() || quote.contains(':') {
            return Err(invalid());
        }

        Ok(Self::new(base, quote))
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol())
    }
}

impl Serialize for Market {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.symbol())
    }
}

impl<'de> Deserialize<'de> for Market {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        symbol.parse().map_err(serde::de::Error::custom)
    }
}

/// Direction of a trade, taken from the sign of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Give quote, receive base.
    Buy,
    /// Give base, receive quote.
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// What the user wants to trade, in human units.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeIntent {
    pub market: Market,
    /// Base-asset quantity; negative sells.
    pub amount: Decimal,
    /// Quote per base.
    pub price: Decimal,
    pub ttl: Duration,
}

impl TradeIntent {
    pub fn new(market: Market, amount: Decimal, price: Decimal, ttl: Duration) -> Self {
        Self {
            market,
            amount,
            price,
            ttl,
        }
    }

    /// Trade direction. Zero amounts have no side.
    pub fn side(&self) -> Option<Side> {
        if self.amount.is_zero() {
            None
        } else if self.amount.is_sign_negative() {
            Some(Side::Sell)
        } else {
            Some(Side::Buy)
        }
    }

    /// Symbols of the token given and the token received.
    pub fn give_receive_symbols(&self) -> Option<(&str, &str)> {
        self.side().map(|side| match side {
            Side::Sell => (self.market.base.as_str(), self.market.quote.as_str()),
            Side::Buy => (self.market.quote.as_str(), self.market.base.as_str()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact_symbol() {
        let market: Market = "tETHUSD".parse().unwrap();
        assert_eq!(market, Market::new("ETH", "USD"));

        let market: Market = "tOMGETH".parse().unwrap();
        assert_eq!(market.base, "OMG");
        assert_eq!(market.quote, "ETH");

        let market: Market = "tZRXUSD".parse().unwrap();
        assert_eq!(market.symbol(), "tZRXUSD");
    }

    #[test]
    fn test_parse_long_base() {
        let market: Market = "tMANAETH".parse().unwrap();
        assert_eq!(market.base, "MANA");
        assert_eq!(market.quote, "ETH");
        assert_eq!(market.symbol(), "tMANAETH");
    }

    #[test]
    fn test_parse_colon_symbol() {
        let market: Market = "tTESTBTC:TESTUSD".parse().unwrap();
        assert_eq!(market.base, "TESTBTC");
        assert_eq!(market.quote, "TESTUSD");
        assert_eq!(market.to_string(), "tTESTBTC:TESTUSD");
    }

    #[test]
    fn test_parse_invalid_symbols() {
        for symbol in ["ETHUSD", "tUSD", "t", "t:USD", "tETH:", "tETH-USD", "tA:B:C"] {
            assert!(
                matches!(symbol.parse::<Market>(), Err(Error::InvalidMarket(_))),
                "{symbol} should be rejected"
            );
        }
    }

    #[test]
    fn test_side_from_amount() {
        let market = Market::new("ETH", "USD");
        let ttl = Duration::hours(1);

        let sell = TradeIntent::new(market.clone(), Decimal::new(-1, 1), Decimal::from(1000), ttl);
        assert_eq!(sell.side(), Some(Side::Sell));
        assert_eq!(sell.give_receive_symbols(), Some(("ETH", "USD")));

        let buy = TradeIntent::new(market.clone(), Decimal::new(1, 1), Decimal::from(1000), ttl);
        assert_eq!(buy.side(), Some(Side::Buy));
        assert_eq!(buy.give_receive_symbols(), Some(("USD", "ETH")));

        let zero = TradeIntent::new(market, Decimal::ZERO, Decimal::from(1000), ttl);
        assert_eq!(zero.side(), None);
    }

    #[test]
    fn test_market_serde() {
        let market = Market::new("ETH", "DAI");
        let json = serde_json::to_string(&market).unwrap();
        assert_eq!(json, "\"tETHDAI\"");

        let back: Market = serde_json::from_str(&json).unwrap();
        assert_eq!(back, market);
    }
}
