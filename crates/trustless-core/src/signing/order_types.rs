//! 0x v2 order structure, builder and EIP-712 digest.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use tracing::debug;

use super::domain::{typed_data_hash, ExchangeDomain, ERC20_PROXY_ID};
use super::signer::OrderSignature;
use crate::amount::EncodedAmounts;
use crate::clock::Clock;
use crate::config::ExchangeConfig;
use crate::types::{OrderMeta, TradeIntent};
use crate::{Error, Result};

/// EIP-712 type string of the 0x v2 `Order` struct.
const ORDER_TYPE: &[u8] = b"Order(address makerAddress,address takerAddress,address feeRecipientAddress,address senderAddress,uint256 makerAssetAmount,uint256 takerAssetAmount,uint256 makerFee,uint256 takerFee,uint256 expirationTimeSeconds,uint256 salt,bytes makerAssetData,bytes takerAssetData)";

const ADDRESS_LEN: usize = 20;

/// Unsigned 0x v2 order.
///
/// This matches the struct hashed by the exchange contract. Signing it
/// produces a separate [`SignedOrder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Maker address (your wallet).
    pub maker_address: Address,
    /// Taker address (zero for any taker).
    pub taker_address: Address,
    pub fee_recipient_address: Address,
    /// Only this address may submit the order to the contract.
    pub sender_address: Address,
    /// Amount given, in base units of the maker asset.
    pub maker_asset_amount: U256,
    /// Amount received, in base units of the taker asset.
    pub taker_asset_amount: U256,
    pub maker_fee: U256,
    pub taker_fee: U256,
    pub expiration_time_seconds: U256,
    pub salt: U256,
    pub maker_asset_data: Bytes,
    pub taker_asset_data: Bytes,
    pub exchange_address: Address,
}

impl Order {
    /// Compute the EIP-712 struct hash for this order.
    pub fn struct_hash(&self) -> B256 {
        let order_type_hash = keccak256(ORDER_TYPE);

        // EIP-712 encodeData: all values must be padded to 32 bytes and
        // dynamic `bytes` are replaced by their hash.
        let encoded = (
            order_type_hash,
            B256::left_padding_from(self.maker_address.as_slice()),
            B256::left_padding_from(self.taker_address.as_slice()),
            B256::left_padding_from(self.fee_recipient_address.as_slice()),
            B256::left_padding_from(self.sender_address.as_slice()),
            self.maker_asset_amount,
            self.taker_asset_amount,
            self.maker_fee,
            self.taker_fee,
            self.expiration_time_seconds,
            self.salt,
            keccak256(&self.maker_asset_data),
            keccak256(&self.taker_asset_data),
        )
            .abi_encode_packed();

        keccak256(&encoded)
    }

    /// The order hash that gets signed.
    pub fn digest(&self) -> B256 {
        let domain = ExchangeDomain::zero_ex_v2(self.exchange_address);
        typed_data_hash(domain.separator(), self.struct_hash())
    }

    /// Wire form without a signature.
    pub fn to_meta(&self) -> OrderMeta {
        OrderMeta {
            maker_address: address_hex(&self.maker_address),
            taker_address: address_hex(&self.taker_address),
            fee_recipient_address: address_hex(&self.fee_recipient_address),
            sender_address: address_hex(&self.sender_address),
            maker_asset_amount: self.maker_asset_amount.to_string(),
            taker_asset_amount: self.taker_asset_amount.to_string(),
            maker_fee: self.maker_fee.to_string(),
            taker_fee: self.taker_fee.to_string(),
            expiration_time_seconds: self.expiration_time_seconds.to_string(),
            salt: self.salt.to_string(),
            maker_asset_data: format!("0x{}", hex::encode(&self.maker_asset_data)),
            taker_asset_data: format!("0x{}", hex::encode(&self.taker_asset_data)),
            exchange_address: address_hex(&self.exchange_address),
            signature: None,
        }
    }

    /// Parse the wire form back into a typed order.
    ///
    /// Any signature in `meta` is ignored.
    pub fn from_meta(meta: &OrderMeta) -> Result<Self> {
        Ok(Self {
            maker_address: parse_address("makerAddress", &meta.maker_address)?,
            taker_address: parse_address("takerAddress", &meta.taker_address)?,
            fee_recipient_address: parse_address(
                "feeRecipientAddress",
                &meta.fee_recipient_address,
            )?,
            sender_address: parse_address("senderAddress", &meta.sender_address)?,
            maker_asset_amount: parse_uint("makerAssetAmount", &meta.maker_asset_amount)?,
            taker_asset_amount: parse_uint("takerAssetAmount", &meta.taker_asset_amount)?,
            maker_fee: parse_uint("makerFee", &meta.maker_fee)?,
            taker_fee: parse_uint("takerFee", &meta.taker_fee)?,
            expiration_time_seconds: parse_uint(
                "expirationTimeSeconds",
                &meta.expiration_time_seconds,
            )?,
            salt: parse_uint("salt", &meta.salt)?,
            maker_asset_data: parse_bytes("makerAssetData", &meta.maker_asset_data)?,
            taker_asset_data: parse_bytes("takerAssetData", &meta.taker_asset_data)?,
            exchange_address: parse_address("exchangeAddress", &meta.exchange_address)?,
        })
    }
}

/// Digest of an order in wire form.
pub fn digest_meta(meta: &OrderMeta) -> Result<B256> {
    Ok(Order::from_meta(meta)?.digest())
}

/// 0x v2 ERC-20 asset data: proxy id followed by the padded token address.
pub fn erc20_asset_data(token: Address) -> Bytes {
    let mut data = Vec::with_capacity(4 + 32);
    data.extend_from_slice(&ERC20_PROXY_ID);
    data.extend_from_slice(B256::left_padding_from(token.as_slice()).as_slice());
    Bytes::from(data)
}

/// An order together with its signature.
///
/// Fields are private: once signed, neither the order nor its signature can
/// change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedOrder {
    order: Order,
    signature: OrderSignature,
}

impl SignedOrder {
    pub(crate) fn new(order: Order, signature: OrderSignature) -> Self {
        Self { order, signature }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn signature(&self) -> &OrderSignature {
        &self.signature
    }

    /// Wire form including the signature.
    pub fn to_meta(&self) -> OrderMeta {
        OrderMeta {
            signature: Some(self.signature.to_hex()),
            ..self.order.to_meta()
        }
    }

    /// Parse a signed wire order.
    pub fn from_meta(meta: &OrderMeta) -> Result<Self> {
        let signature = meta
            .signature
            .as_deref()
            .ok_or_else(|| Error::malformed("order has no signature"))?;

        Ok(Self {
            order: Order::from_meta(meta)?,
            signature: OrderSignature::from_hex(signature)?,
        })
    }

    /// Recover the address that signed this order.
    pub fn recover_signer(&self) -> Result<Address> {
        self.signature.recover(&self.order.digest())
    }

    /// Whether the signature was produced by the order's maker.
    pub fn is_signed_by_maker(&self) -> bool {
        self.recover_signer()
            .map(|signer| signer == self.order.maker_address)
            .unwrap_or(false)
    }
}

/// Builds unsigned orders against a config snapshot.
pub struct OrderBuilder<'a> {
    config: &'a ExchangeConfig,
    clock: &'a dyn Clock,
    salt: Option<U256>,
}

impl<'a> OrderBuilder<'a> {
    pub fn new(config: &'a ExchangeConfig, clock: &'a dyn Clock) -> Self {
        Self {
            config,
            clock,
            salt: None,
        }
    }

    /// Use a fixed salt instead of a random one.
    pub fn with_salt(mut self, salt: U256) -> Self {
        self.salt = Some(salt);
        self
    }

    /// Build the unsigned order for `intent`.
    ///
    /// The operator address from config is both fee recipient and sender;
    /// the taker is left open.
    pub fn build(
        &self,
        intent: &TradeIntent,
        encoded: EncodedAmounts,
        maker: Address,
    ) -> Result<Order> {
        let ttl_secs = intent.ttl.num_seconds();
        if ttl_secs <= 0 {
            return Err(Error::InvalidTtl { ttl_secs });
        }

        let (give_symbol, receive_symbol) = intent
            .give_receive_symbols()
            .ok_or_else(|| Error::invalid_amount("amount must be non-zero"))?;
        let give = self.config.token_of(give_symbol)?;
        let receive = self.config.token_of(receive_symbol)?;

        let now = self.clock.unix_seconds()?;
        let expiry = now.checked_add(ttl_secs.unsigned_abs()).ok_or(Error::InvalidTtl { ttl_secs })?;
        let salt = self.salt.unwrap_or_else(random_salt);

        debug!(
            market = %intent.market,
            maker = %maker,
            give = give_symbol,
            receive = receive_symbol,
            expiry,
            "Built order"
        );

        Ok(Order {
            maker_address: maker,
            taker_address: Address::ZERO,
            fee_recipient_address: self.config.operator_address,
            sender_address: self.config.operator_address,
            maker_asset_amount: encoded.give_amount,
            taker_asset_amount: encoded.receive_amount,
            maker_fee: U256::ZERO,
            taker_fee: U256::ZERO,
            expiration_time_seconds: U256::from(expiry),
            salt,
            maker_asset_data: erc20_asset_data(give.wrapper_address),
            taker_asset_data: erc20_asset_data(receive.wrapper_address),
            exchange_address: self.config.exchange_address,
        })
    }
}

impl std::fmt::Debug for OrderBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBuilder")
            .field("exchange", &self.config.exchange_address)
            .field("salt", &self.salt)
            .finish()
    }
}

/// 256 bits from the thread-local CSPRNG.
fn random_salt() -> U256 {
    U256::from_be_bytes(rand::random::<[u8; 32]>())
}

fn address_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).map_err(|e| Error::malformed(format!("{field} is not hex: {e}")))
}

fn parse_address(field: &str, value: &str) -> Result<Address> {
    let bytes = decode_hex(field, value)?;
    if bytes.len() != ADDRESS_LEN {
        return Err(Error::malformed(format!(
            "{field} must be 20 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(Address::from_slice(&bytes))
}

/// Wire integers are plain base-10 digit strings.
fn parse_uint(field: &str, value: &str) -> Result<U256> {
    if value.trim_start().starts_with('-') {
        return Err(Error::malformed(format!("{field} is negative: {value}")));
    }
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::malformed(format!(
            "{field} is not a decimal integer: {value:?}"
        )));
    }
    U256::from_str_radix(value, 10)
        .map_err(|e| Error::malformed(format!("{field} is out of range: {e}")))
}

fn parse_bytes(field: &str, value: &str) -> Result<Bytes> {
    decode_hex(field, value).map(Bytes::from)
}
