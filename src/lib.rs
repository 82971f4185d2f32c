//! Trustless: exact order encoding and signing for the Trustless 0x exchange
//!
//! This is the root crate that provides benchmark and integration test access
//! to the workspace. For actual functionality, use `trustless-core` directly:
//!
//! - `amount`: Exact base-unit encoding with settle spread and fee
//! - `signing`: 0x v2 EIP-712 order hashing, order signatures, request auth
//! - `session`: Trading session tying config, wallet and clock together

// Re-export for benchmarks
pub use trustless_core as core;
