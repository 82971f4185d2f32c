//! secp256k1 signing of order digests.
//!
//! Order signatures use the 0x v2 layout `v ++ r ++ s ++ signatureType`
//! (66 bytes) rendered as `0x` hex.

use std::str::FromStr;

use alloy_primitives::{Address, Signature, B256, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use tracing::debug;

use super::domain::SignatureType;
use super::order_types::{Order, SignedOrder};
use super::request_auth::signed_message_digest;
use crate::{Error, Result};

/// Offset added to the recovery id to form `v`.
const V_OFFSET: u8 = 27;

/// Length in bytes of a serialized order signature.
pub const ORDER_SIGNATURE_LEN: usize = 1 + 32 + 32 + 1;

/// ECDSA signature over an order digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSignature {
    /// `27 + recovery id`.
    pub v: u8,
    pub r: B256,
    pub s: B256,
    pub signature_type: SignatureType,
}

impl OrderSignature {
    /// Wrap a recoverable signature as an EIP-712 order signature.
    pub fn from_signature(signature: &Signature) -> Self {
        Self {
            v: V_OFFSET + u8::from(signature.v()),
            r: B256::from(signature.r().to_be_bytes::<32>()),
            s: B256::from(signature.s().to_be_bytes::<32>()),
            signature_type: SignatureType::Eip712,
        }
    }

    /// Recovery id (0 or 1).
    pub fn recovery_id(&self) -> u8 {
        self.v.saturating_sub(V_OFFSET)
    }

    pub fn to_bytes(&self) -> [u8; ORDER_SIGNATURE_LEN] {
        let mut bytes = [0u8; ORDER_SIGNATURE_LEN];
        bytes[0] = self.v;
        bytes[1..33].copy_from_slice(self.r.as_slice());
        bytes[33..65].copy_from_slice(self.s.as_slice());
        bytes[65] = self.signature_type.as_u8();
        bytes
    }

    /// `0x` followed by 132 hex characters.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Parse a serialized order signature.
    pub fn from_hex(value: &str) -> Result<Self> {
        let digits = value.strip_prefix("0x").unwrap_or(value);
        let bytes = hex::decode(digits)
            .map_err(|e| Error::malformed(format!("signature is not hex: {e}")))?;

        if bytes.len() != ORDER_SIGNATURE_LEN {
            return Err(Error::malformed(format!(
                "signature must be {ORDER_SIGNATURE_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let v = bytes[0];
        if v != V_OFFSET && v != V_OFFSET + 1 {
            return Err(Error::malformed(format!("invalid signature v: {v}")));
        }
        let signature_type = SignatureType::from_u8(bytes[65]).ok_or_else(|| {
            Error::malformed(format!("unsupported signature type: {}", bytes[65]))
        })?;

        Ok(Self {
            v,
            r: B256::from_slice(&bytes[1..33]),
            s: B256::from_slice(&bytes[33..65]),
            signature_type,
        })
    }

    /// Recover the signer's address from the order hash `digest`.
    ///
    /// `EthSign` signatures cover the EIP-191 prefixed hash instead.
    pub fn recover(&self, digest: &B256) -> Result<Address> {
        let signature = Signature::new(
            U256::from_be_bytes(self.r.0),
            U256::from_be_bytes(self.s.0),
            self.recovery_id() == 1,
        );
        let prehash = match self.signature_type {
            SignatureType::Eip712 => *digest,
            SignatureType::EthSign => signed_message_digest(digest.as_slice()),
        };

        signature
            .recover_address_from_prehash(&prehash)
            .map_err(|e| Error::malformed(format!("signature does not recover: {e}")))
    }
}

/// A wallet holding the private key used for signing.
///
/// The key never appears in `Debug` output or logs.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Load wallet from the `WALLET_PRIVATE_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let private_key = std::env::var("WALLET_PRIVATE_KEY").map_err(|_| Error::Config {
            message: "WALLET_PRIVATE_KEY environment variable not set".to_string(),
        })?;

        Self::from_private_key(&private_key)
    }

    /// Create a wallet from a hex-encoded private key.
    ///
    /// # Arguments
    ///
    /// * `key` - A 64-character hex string, optionally prefixed with "0x"
    pub fn from_private_key(key: &str) -> Result<Self> {
        let key_clean = key.trim().trim_start_matches("0x");

        let signer = PrivateKeySigner::from_str(key_clean).map_err(|_| Error::InvalidKey {
            message: "expected 64 hex characters encoding a secp256k1 scalar".to_string(),
        })?;

        Ok(Self { signer })
    }

    /// Get the wallet's Ethereum address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a 32-byte digest, returning the recoverable signature.
    ///
    /// Signing is deterministic (RFC 6979) and the `s` value is low.
    pub fn sign_digest(&self, digest: &B256) -> Result<Signature> {
        self.signer
            .sign_hash_sync(digest)
            .map_err(|e| Error::SigningFailure {
                message: e.to_string(),
            })
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish()
    }
}

/// Sign `digest` with a hex private key that is only held for this call.
pub fn sign(digest: &B256, private_key: &str) -> Result<OrderSignature> {
    let wallet = Wallet::from_private_key(private_key)?;
    let signature = wallet.sign_digest(digest)?;
    Ok(OrderSignature::from_signature(&signature))
}

/// Signs orders with a wallet.
#[derive(Clone, Debug)]
pub struct OrderSigner {
    wallet: Wallet,
}

impl OrderSigner {
    pub fn new(wallet: Wallet) -> Self {
        Self { wallet }
    }

    /// Get the signer's address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Sign an order and return the signed order ready for submission.
    pub fn sign_order(&self, order: Order) -> Result<SignedOrder> {
        let digest = order.digest();
        let signature = self.wallet.sign_digest(&digest)?;

        debug!(order_hash = %digest, maker = %order.maker_address, "Signed order");

        Ok(SignedOrder::new(
            order,
            OrderSignature::from_signature(&signature),
        ))
    }
}
