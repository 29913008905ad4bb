//! # Web3 Library
//!
//! BNB Smart Chain integration for the presale: contract bindings, the
//! read-only RPC client, the wallet signer seam and [`Web3Service`].

pub mod client;
pub mod contracts;
pub mod service;
pub mod signer;
pub mod units;

// Re-export commonly used types from root for convenience
pub use client::{ChainReader, OnChainPresaleConfig, RpcReader};
pub use service::{check_purchase_amount, Web3Service};
pub use signer::{SignerSource, WalletSigner};
pub use units::{estimate_sprai_amount, format_token_amount, parse_token_amount, TOKEN_DECIMALS};
