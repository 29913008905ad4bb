//! Wallet Connection Adapter
//!
//! Owns the registered connectors and the async connect flow. Wallet
//! options are resolved to a connector with
//! [`select_connector`](lib_core::model::select_connector); the adapter then
//! talks to that connector through the EIP-1193 bridge.

use leptos::prelude::*;
use lib_core::config::Config;
use lib_core::error::{AppError, Result};
use lib_core::model::{select_connector, ConnectorDescriptor, ConnectorKind, WalletAction, WalletOption};
use wasm_bindgen::JsValue;

use crate::services::eip1193::{self, parse_account, parse_hex_quantity, WalletConnectSettings};
use crate::state::wallet::WalletContext;

/// Progress of the most recent connect attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

#[derive(Clone, Copy)]
pub struct ConnectionAdapter {
    connectors: StoredValue<Vec<ConnectorDescriptor>>,
    walletconnect: StoredValue<Option<WalletConnectSettings>>,
    subscribed: StoredValue<ListenerRegistry>,
    pub status: RwSignal<ConnectStatus>,
    pub error: RwSignal<Option<String>>,
    /// Connector of the current session, read by the signer source
    pub active: RwSignal<Option<ConnectorKind>>,
}

impl ConnectionAdapter {
    pub fn new(config: &Config) -> Self {
        let walletconnect = config
            .walletconnect_project_id
            .clone()
            .map(|project_id| WalletConnectSettings {
                project_id,
                chain_id: config.chain_id(),
                rpc_url: config.rpc_url.clone(),
                metadata: config.metadata.clone(),
            });

        if walletconnect.is_none() {
            log::warn!("WALLETCONNECT_PROJECT_ID not set; WalletConnect is unavailable");
        }

        Self {
            connectors: StoredValue::new(ConnectorDescriptor::defaults(walletconnect.is_some())),
            walletconnect: StoredValue::new(walletconnect),
            subscribed: StoredValue::new(ListenerRegistry::default()),
            status: RwSignal::new(ConnectStatus::Idle),
            error: RwSignal::new(None),
            active: RwSignal::new(None),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status.get() == ConnectStatus::Pending
    }

    /// Connect with the connector behind `option`.
    ///
    /// Resolves to the checksummed account and the wallet's chain id.
    pub async fn connect(&self, option: &WalletOption) -> Result<(String, u64)> {
        let connector = self
            .connectors
            .with_value(|connectors| select_connector(connectors, option).cloned());
        let connector = match connector {
            Ok(connector) => connector,
            Err(e) => {
                self.fail(&e);
                return Err(e);
            }
        };

        self.status.set(ConnectStatus::Pending);
        self.error.set(None);
        log::info!("Connecting {} via {}", option.name, connector.id);

        match self.open_session(connector.kind).await {
            Ok(session) => {
                self.active.set(Some(connector.kind));
                self.status.set(ConnectStatus::Success);
                log::info!("Connected {} on chain {}", session.0, session.1);
                Ok(session)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    async fn open_session(&self, kind: ConnectorKind) -> Result<(String, u64)> {
        if kind == ConnectorKind::WalletConnect {
            let settings = self
                .walletconnect
                .get_value()
                .ok_or_else(|| AppError::ConnectorNotFound("WalletConnect".to_string()))?;
            eip1193::init_wallet_connect(&settings).await?;
        } else if !eip1193::has_provider(kind) {
            return Err(AppError::NoProvider);
        }

        eip1193::request_accounts(kind).await
    }

    fn fail(&self, error: &AppError) {
        log::error!("Wallet connection failed [{}]: {}", error.code(), error);
        self.status.set(ConnectStatus::Error);
        self.error.set(Some(error.user_message()));
    }

    /// Forget the session and reset the wallet state.
    pub async fn disconnect(&self, wallet: WalletContext) {
        if let Some(kind) = self.active.get_untracked() {
            if let Err(e) = eip1193::disconnect(kind).await {
                log::warn!("Provider disconnect failed: {}", e);
            }
            self.subscribed.update_value(|registry| registry.release(kind));
        }
        self.active.set(None);
        self.status.set(ConnectStatus::Idle);
        self.error.set(None);
        wallet.dispatch(WalletAction::Disconnect);
    }

    /// Follow `accountsChanged` and `chainChanged` from the active
    /// connector. Registers at most once per provider instance.
    pub fn subscribe(&self, wallet: WalletContext, on_account: impl Fn(String) + 'static) {
        let Some(kind) = self.active.get_untracked() else {
            return;
        };
        let mut fresh = false;
        self.subscribed
            .update_value(|registry| fresh = registry.register(kind));
        if !fresh {
            return;
        }

        let adapter = *self;
        eip1193::on_event(kind, "accountsChanged", move |accounts: JsValue| {
            match first_account(&accounts) {
                Some(address) => {
                    // Only follow switches inside a session the user opened here
                    let Some(chain_id) = wallet.chain_id() else {
                        return;
                    };
                    log::info!("Account changed to {}", address);
                    wallet.dispatch(WalletAction::Sync {
                        address: address.clone(),
                        chain_id,
                    });
                    on_account(address);
                }
                None => {
                    log::info!("Wallet disconnected all accounts");
                    // Drop the provider so the next session builds a new one
                    leptos::task::spawn_local(async move {
                        if let Err(e) = eip1193::disconnect(kind).await {
                            log::warn!("Provider disconnect failed: {}", e);
                        }
                    });
                    adapter
                        .subscribed
                        .update_value(|registry| registry.release(kind));
                    adapter.active.set(None);
                    adapter.status.set(ConnectStatus::Idle);
                    wallet.dispatch(WalletAction::Disconnect);
                }
            }
        });

        eip1193::on_event(kind, "chainChanged", move |chain: JsValue| {
            let raw = chain
                .as_string()
                .or_else(|| chain.as_f64().map(|n| (n as u64).to_string()));
            match raw.as_deref().map(parse_hex_quantity) {
                Some(Ok(chain_id)) => {
                    log::info!("Chain changed to {}", chain_id);
                    wallet.dispatch(WalletAction::SetChainId(chain_id));
                }
                _ => log::warn!("Ignoring malformed chainChanged payload: {:?}", chain),
            }
        });
    }
}

/// Connectors whose provider events are wired up.
///
/// The injected provider lives as long as the page, so its listeners are
/// registered once. A WalletConnect provider is rebuilt for every session
/// and needs fresh listeners after it is released.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListenerRegistry {
    kinds: Vec<ConnectorKind>,
}

impl ListenerRegistry {
    /// Returns true when listeners still have to be attached for `kind`.
    pub fn register(&mut self, kind: ConnectorKind) -> bool {
        if self.kinds.contains(&kind) {
            return false;
        }
        self.kinds.push(kind);
        true
    }

    /// Forget `kind` when its session ended and the provider is discarded.
    pub fn release(&mut self, kind: ConnectorKind) {
        if kind == ConnectorKind::WalletConnect {
            self.kinds.retain(|k| *k != kind);
        }
    }
}

/// First well-formed account of an `accountsChanged` payload, checksummed.
fn first_account(accounts: &JsValue) -> Option<String> {
    if !js_sys::Array::is_array(accounts) {
        return None;
    }
    js_sys::Array::from(accounts)
        .get(0)
        .as_string()
        .and_then(|raw| parse_account(&raw).ok())
        .map(|address| address.to_checksum(None))
}

pub fn provide_connection_adapter(config: &Config) -> ConnectionAdapter {
    let adapter = ConnectionAdapter::new(config);
    provide_context(adapter);
    adapter
}

pub fn use_connection_adapter() -> ConnectionAdapter {
    expect_context::<ConnectionAdapter>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injected_listeners_registered_once() {
        let mut registry = ListenerRegistry::default();
        assert!(registry.register(ConnectorKind::Injected));
        registry.release(ConnectorKind::Injected);
        assert!(!registry.register(ConnectorKind::Injected));
    }

    #[test]
    fn test_walletconnect_reconnect_gets_fresh_listeners() {
        let mut registry = ListenerRegistry::default();
        assert!(registry.register(ConnectorKind::WalletConnect));
        assert!(!registry.register(ConnectorKind::WalletConnect));

        // Session ended, the provider object is discarded
        registry.release(ConnectorKind::WalletConnect);
        assert!(registry.register(ConnectorKind::WalletConnect));
    }

    #[test]
    fn test_release_keeps_other_connectors() {
        let mut registry = ListenerRegistry::default();
        registry.register(ConnectorKind::Injected);
        registry.register(ConnectorKind::WalletConnect);
        registry.release(ConnectorKind::WalletConnect);
        assert!(!registry.register(ConnectorKind::Injected));
        assert!(registry.register(ConnectorKind::WalletConnect));
    }
}
