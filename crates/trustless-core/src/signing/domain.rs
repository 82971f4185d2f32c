//! EIP-712 domain for the 0x v2 exchange contract.
//!
//! The 0x v2 domain has no chain id: it is
//! `EIP712Domain(string name,string version,address verifyingContract)`
//! with the exchange contract as verifying contract.

use alloy_primitives::{keccak256, Address, B256};
use alloy_sol_types::SolValue;

/// Domain name used by the 0x v2 exchange.
pub const ZERO_EX_DOMAIN_NAME: &str = "0x Protocol";

/// Domain version used by the 0x v2 exchange.
pub const ZERO_EX_DOMAIN_VERSION: &str = "2";

/// 0x v2 ERC-20 asset proxy id, `bytes4(keccak256("ERC20Token(address)"))`.
pub const ERC20_PROXY_ID: [u8; 4] = [0xf4, 0x72, 0x61, 0xb0];

/// EIP-712 domain separator for order signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeDomain {
    pub name: String,
    pub version: String,
    pub verifying_contract: Address,
}

impl ExchangeDomain {
    /// Domain for a 0x v2 exchange deployed at `exchange`.
    pub fn zero_ex_v2(exchange: Address) -> Self {
        Self {
            name: ZERO_EX_DOMAIN_NAME.to_string(),
            version: ZERO_EX_DOMAIN_VERSION.to_string(),
            verifying_contract: exchange,
        }
    }

    /// Compute the EIP-712 domain separator hash.
    pub fn separator(&self) -> B256 {
        let domain_type_hash =
            keccak256(b"EIP712Domain(string name,string version,address verifyingContract)");

        let name_hash = keccak256(self.name.as_bytes());
        let version_hash = keccak256(self.version.as_bytes());
        // encodeData pads addresses to a full word
        let contract_padded = B256::left_padding_from(self.verifying_contract.as_slice());

        let encoded = (domain_type_hash, name_hash, version_hash, contract_padded).abi_encode_packed();

        keccak256(&encoded)
    }
}

/// Compute the EIP-712 typed data hash:
/// `keccak256("\x19\x01" ++ domainSeparator ++ structHash)`.
pub fn typed_data_hash(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut data = Vec::with_capacity(2 + 32 + 32);
    data.extend_from_slice(&[0x19, 0x01]);
    data.extend_from_slice(domain_separator.as_slice());
    data.extend_from_slice(struct_hash.as_slice());
    keccak256(&data)
}

/// 0x v2 signature type, appended as the last byte of an order signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureType {
    /// Signature over the EIP-712 order hash.
    #[default]
    Eip712,
    /// Signature over the EIP-191 prefixed order hash.
    EthSign,
}

impl SignatureType {
    /// Get the numeric value used on the wire.
    pub fn as_u8(&self) -> u8 {
        match self {
            SignatureType::Eip712 => 2,
            SignatureType::EthSign => 3,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            2 => Some(SignatureType::Eip712),
            3 => Some(SignatureType::EthSign),
            _ => None,
        }
    }
}
