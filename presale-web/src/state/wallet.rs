//! Wallet state management
//!
//! The signal holds a [`WalletState`]; every change goes through
//! [`WalletContext::dispatch`] and the pure reducer.

use std::rc::Rc;

use leptos::prelude::*;
use lib_core::model::{refresh_balances, BalanceReader, WalletAction, WalletState};

/// Global wallet context
#[derive(Clone, Copy)]
pub struct WalletContext {
    pub wallet: RwSignal<WalletState>,
}

impl WalletContext {
    pub fn new() -> Self {
        Self {
            wallet: RwSignal::new(WalletState::default()),
        }
    }

    pub fn dispatch(&self, action: WalletAction) {
        log::debug!("Wallet action: {:?}", action);
        self.wallet
            .update(|state| *state = std::mem::take(state).reduce(action));
    }

    pub fn is_connected(&self) -> bool {
        self.wallet.with(|state| state.connected)
    }

    pub fn address(&self) -> Option<String> {
        self.wallet.with(|state| state.address.clone())
    }

    pub fn usdt_balance(&self) -> String {
        self.wallet.with(|state| state.usdt_balance.clone())
    }

    pub fn is_wrong_network(&self, expected_chain_id: u64) -> bool {
        self.wallet.with(|state| state.is_wrong_network(expected_chain_id))
    }

    /// Untracked; for event handlers
    pub fn chain_id(&self) -> Option<u64> {
        self.wallet.with_untracked(|state| state.chain_id)
    }

    /// Refresh the USDT balance of `address` in the background.
    ///
    /// A failure is logged and leaves the state untouched.
    pub fn refresh_balances<R>(&self, reader: Rc<R>, address: String)
    where
        R: BalanceReader + 'static,
    {
        let ctx = *self;
        leptos::task::spawn_local(async move {
            match refresh_balances(reader.as_ref(), &address).await {
                Ok(action) => ctx.dispatch(action),
                Err(e) => log::warn!("Balance refresh failed: {}", e),
            }
        });
    }
}

impl Default for WalletContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn provide_wallet_context() -> WalletContext {
    let context = WalletContext::new();
    provide_context(context);
    context
}

pub fn use_wallet_context() -> WalletContext {
    expect_context::<WalletContext>()
}
