//! Nonce-based authentication for read endpoints.
//!
//! The server checks a signature over an EIP-191 personal message whose
//! body is a decimal nonce slightly ahead of the current time. The
//! signature string here is not the order signature layout: it is
//! `0x ++ hex(r) ++ hex(s) ++ "0" ++ recoveryId` with unpadded `r` and `s`.

use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::{keccak256, Signature, B256};
use tracing::{debug, warn};

use super::signer::Wallet;
use crate::clock::Clock;
use crate::config::{OrderSettings, DEFAULT_NONCE_BIAS_SECS};
use crate::types::AuthPayload;
use crate::Result;

/// EIP-191 personal message prefix.
const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// `floor(now) + bias`.
pub fn nonce_from_clock(clock: &dyn Clock, bias_secs: u64) -> Result<u64> {
    Ok(clock.unix_seconds()?.saturating_add(bias_secs))
}

/// `keccak256("\x19Ethereum Signed Message:\n" ++ len(message) ++ message)`.
pub fn signed_message_digest(message: &[u8]) -> B256 {
    let length = message.len().to_string();

    let mut data = Vec::with_capacity(SIGNED_MESSAGE_PREFIX.len() + length.len() + message.len());
    data.extend_from_slice(SIGNED_MESSAGE_PREFIX);
    data.extend_from_slice(length.as_bytes());
    data.extend_from_slice(message);

    keccak256(&data)
}

/// Render a signature in the request-auth format.
pub fn format_auth_signature(signature: &Signature) -> String {
    format!(
        "0x{:x}{:x}0{}",
        signature.r(),
        signature.s(),
        u8::from(signature.v())
    )
}

/// Sign `nonce` and wrap it in the request payload.
pub fn sign_nonce(nonce: u64, wallet: &Wallet, protocol: &str) -> Result<AuthPayload> {
    let nonce = nonce.to_string();
    let digest = signed_message_digest(nonce.as_bytes());
    let signature = wallet.sign_digest(&digest)?;

    debug!(nonce = %nonce, address = %wallet.address(), "Signed request nonce");

    Ok(AuthPayload {
        nonce,
        protocol: protocol.to_string(),
        signature: format_auth_signature(&signature),
    })
}

/// One-shot authenticator with the default 30 second nonce bias.
pub fn authenticate(clock: &dyn Clock, wallet: &Wallet, protocol: &str) -> Result<AuthPayload> {
    let nonce = nonce_from_clock(clock, DEFAULT_NONCE_BIAS_SECS)?;
    sign_nonce(nonce, wallet, protocol)
}

/// Issues strictly increasing nonces on top of the clock.
///
/// Each nonce is `max(clock + bias, previous + 1)`, so callers sharing an
/// issuer never reuse a nonce even within one clock second.
#[derive(Debug, Default)]
pub struct NonceIssuer {
    last: AtomicU64,
}

impl NonceIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, clock: &dyn Clock, bias_secs: u64) -> Result<u64> {
        let candidate = nonce_from_clock(clock, bias_secs)?;

        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(candidate.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        let issued = candidate.max(previous.saturating_add(1));

        if issued > candidate {
            warn!(
                clock_nonce = candidate,
                issued, "Nonce issued ahead of clock to stay unique"
            );
        }

        Ok(issued)
    }

    /// Last nonce handed out, zero if none.
    pub fn last_issued(&self) -> u64 {
        self.last.load(Ordering::Acquire)
    }
}

/// Authenticates read requests with a wallet, never reusing a nonce.
#[derive(Debug)]
pub struct RequestAuthenticator {
    nonces: NonceIssuer,
    nonce_bias_secs: u64,
    protocol: String,
}

impl RequestAuthenticator {
    pub fn new(settings: &OrderSettings) -> Self {
        Self {
            nonces: NonceIssuer::new(),
            nonce_bias_secs: settings.nonce_bias_secs,
            protocol: settings.protocol.clone(),
        }
    }

    pub fn authenticate(&self, clock: &dyn Clock, wallet: &Wallet) -> Result<AuthPayload> {
        let nonce = self.nonces.issue(clock, self.nonce_bias_secs)?;
        sign_nonce(nonce, wallet, &self.protocol)
    }
}
