//! # Wallet Signer Seam
//!
//! Write-side access to the connected wallet. The browser implements this on
//! top of an EIP-1193 provider (`window.ethereum` or a WalletConnect
//! session); tests use in-memory fakes.
//!
//! Signing always happens inside the wallet. This crate only builds calldata
//! and asks the wallet to send it.

use alloy::primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use lib_core::error::Result;

/// A connected account able to read through, and send from, the wallet.
#[async_trait(?Send)]
pub trait WalletSigner {
    /// Currently selected account.
    async fn address(&self) -> Result<Address>;

    /// `eth_call` through the wallet's own RPC.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;

    /// `eth_sendTransaction`; resolves once the wallet has signed and
    /// broadcast, not when the transaction is mined.
    async fn send_transaction(&self, from: Address, to: Address, data: Bytes) -> Result<TxHash>;

    /// Resolve once `hash` has been mined; errors when it reverted.
    async fn wait_for_confirmation(&self, hash: TxHash) -> Result<()>;
}

/// Where the service gets a signer from at the moment of a purchase.
///
/// `None` means no wallet provider is available (no extension and no
/// WalletConnect session).
pub trait SignerSource {
    type Signer: WalletSigner;

    fn current_signer(&self) -> Option<Self::Signer>;
}
