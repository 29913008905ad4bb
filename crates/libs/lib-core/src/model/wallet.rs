//! # Wallet State Slice
//!
//! Tab-lifetime mirror of the wallet connection for the UI. [`WalletState::reduce`]
//! is a pure `(state, action) -> state` function; the only asynchronous action,
//! [`refresh_balances`], resolves to a [`WalletAction`] that the caller
//! dispatches.
//!
//! Invariant: `connected == false` implies `address == None` and
//! `chain_id == None`.
//!
//! ```rust
//! use lib_core::model::wallet::{WalletAction, WalletState};
//!
//! let state = WalletState::default().reduce(WalletAction::Sync {
//!     address: "0x8ba1f109551bD432803012645Ac136ddd64DBA72".to_string(),
//!     chain_id: 97,
//! });
//! assert!(state.connected);
//!
//! let state = state.reduce(WalletAction::Disconnect);
//! assert_eq!(state, WalletState::default());
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::Result;

/// Balance string used before the first refresh and after disconnect.
pub const ZERO_BALANCE: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletState {
    /// Checksummed account address
    pub address: Option<String>,
    pub chain_id: Option<u64>,
    pub connected: bool,
    /// USDT balance as a decimal string in whole tokens
    pub usdt_balance: String,
    /// SPRAI balance; no action updates it yet
    pub sprai_balance: String,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for WalletState {
    fn default() -> Self {
        Self {
            address: None,
            chain_id: None,
            connected: false,
            usdt_balance: ZERO_BALANCE.to_string(),
            sprai_balance: ZERO_BALANCE.to_string(),
            loading: false,
            error: None,
        }
    }
}

/// Every way the wallet state can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletAction {
    /// Successful connect, or the wallet switched accounts
    Sync { address: String, chain_id: u64 },
    Disconnect,
    /// The wallet switched networks
    SetChainId(u64),
    /// `refresh_balances` resolved
    BalancesRefreshed { usdt_balance: String },
}

impl WalletState {
    /// Apply an action. Total: every action is valid in every state.
    pub fn reduce(mut self, action: WalletAction) -> Self {
        match action {
            WalletAction::Sync { address, chain_id } => {
                self.address = Some(address);
                self.chain_id = Some(chain_id);
                self.connected = true;
            }
            WalletAction::Disconnect => {
                self.address = None;
                self.chain_id = None;
                self.connected = false;
                self.usdt_balance = ZERO_BALANCE.to_string();
                self.sprai_balance = ZERO_BALANCE.to_string();
            }
            WalletAction::SetChainId(chain_id) => {
                // A chain id without an account would break the connected invariant
                if self.connected {
                    self.chain_id = Some(chain_id);
                }
            }
            WalletAction::BalancesRefreshed { usdt_balance } => {
                self.usdt_balance = usdt_balance;
            }
        }
        self
    }

    /// True when connected to a chain other than `expected_chain_id`.
    pub fn is_wrong_network(&self, expected_chain_id: u64) -> bool {
        matches!(self.chain_id, Some(id) if self.connected && id != expected_chain_id)
    }
}

/// Read side the balance refresh depends on.
#[async_trait(?Send)]
pub trait BalanceReader {
    /// USDT balance of `address` as a decimal string.
    async fn usdt_balance(&self, address: &str) -> Result<String>;
}

/// The asynchronous `refreshBalances` action.
///
/// Resolves to the action to dispatch on success. On failure the error is
/// handed back to the caller and nothing in the state changes.
#[instrument(skip(reader))]
pub async fn refresh_balances<R>(reader: &R, address: &str) -> Result<WalletAction>
where
    R: BalanceReader + ?Sized,
{
    let usdt_balance = reader.usdt_balance(address).await?;
    debug!("Refreshed USDT balance: {}", usdt_balance);
    Ok(WalletAction::BalancesRefreshed { usdt_balance })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const ADDR: &str = "0x8ba1f109551bD432803012645Ac136ddd64DBA72";

    fn connected() -> WalletState {
        WalletState::default().reduce(WalletAction::Sync {
            address: ADDR.to_string(),
            chain_id: 56,
        })
    }

    #[test]
    fn test_default_state() {
        let state = WalletState::default();
        assert!(!state.connected);
        assert!(state.address.is_none());
        assert!(state.chain_id.is_none());
        assert_eq!(state.usdt_balance, "0");
        assert_eq!(state.sprai_balance, "0");
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_sync_connects() {
        let state = connected();
        assert!(state.connected);
        assert_eq!(state.address.as_deref(), Some(ADDR));
        assert_eq!(state.chain_id, Some(56));
    }

    #[test]
    fn test_disconnect_resets_everything_from_any_state() {
        let mut dirty = connected().reduce(WalletAction::BalancesRefreshed {
            usdt_balance: "125.5".to_string(),
        });
        dirty.sprai_balance = "9000".to_string();

        let fresh = WalletState::default();
        for start in [dirty, connected(), WalletState::default()] {
            let state = start.reduce(WalletAction::Disconnect);
            assert_eq!(state.address, fresh.address);
            assert_eq!(state.chain_id, fresh.chain_id);
            assert_eq!(state.connected, fresh.connected);
            assert_eq!(state.usdt_balance, fresh.usdt_balance);
            assert_eq!(state.sprai_balance, fresh.sprai_balance);
        }
    }

    #[test]
    fn test_set_chain_id_while_connected() {
        let state = connected().reduce(WalletAction::SetChainId(97));
        assert_eq!(state.chain_id, Some(97));
        assert!(state.is_wrong_network(56));
        assert!(!state.is_wrong_network(97));
    }

    #[test]
    fn test_set_chain_id_while_disconnected_keeps_invariant() {
        let state = WalletState::default().reduce(WalletAction::SetChainId(97));
        assert!(state.chain_id.is_none());
        assert!(!state.is_wrong_network(56));
    }

    #[test]
    fn test_balances_refreshed_only_touches_usdt() {
        let state = connected().reduce(WalletAction::BalancesRefreshed {
            usdt_balance: "42.0".to_string(),
        });
        assert_eq!(state.usdt_balance, "42.0");
        assert_eq!(state.sprai_balance, "0");
        assert!(state.connected);
    }

    struct FixedReader(Result<String>);

    #[async_trait(?Send)]
    impl BalanceReader for FixedReader {
        async fn usdt_balance(&self, _address: &str) -> Result<String> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_refresh_balances_fulfilled() {
        let reader = FixedReader(Ok("100.0".to_string()));
        let action = refresh_balances(&reader, ADDR).await.unwrap();
        assert_eq!(
            action,
            WalletAction::BalancesRefreshed {
                usdt_balance: "100.0".to_string()
            }
        );
    }

    /// Settle a refresh the way the browser context does: dispatch on
    /// success, keep the state on failure.
    fn settle(state: &WalletState, result: Result<WalletAction>) -> WalletState {
        match result {
            Ok(action) => state.clone().reduce(action),
            Err(_) => state.clone(),
        }
    }

    #[tokio::test]
    async fn test_refresh_balances_rejected_leaves_state_alone() {
        let before = connected().reduce(WalletAction::BalancesRefreshed {
            usdt_balance: "125.5".to_string(),
        });

        let reader = FixedReader(Err(AppError::Rpc("timeout".to_string())));
        let result = refresh_balances(&reader, ADDR).await;
        assert_eq!(result, Err(AppError::Rpc("timeout".to_string())));

        let after = settle(&before, result);
        assert_eq!(after, before);
        assert_eq!(after.usdt_balance, "125.5");
        assert!(after.error.is_none());

        // Same state, successful read: the balance moves
        let reader = FixedReader(Ok("7.0".to_string()));
        let after = settle(&before, refresh_balances(&reader, ADDR).await);
        assert_eq!(after.usdt_balance, "7.0");
        assert_eq!(after.address, before.address);
    }
}
