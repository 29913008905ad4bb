//! # Wallet Connectors
//!
//! A *connector* is one way of obtaining wallet authority: the injected
//! browser provider or a remote WalletConnect session. A *wallet option* is a
//! branded button in the wallet modal. Several options (MetaMask, Trust
//! Wallet, Coinbase Wallet) share the injected connector; the first injected
//! connector registered wins, regardless of which extension actually answers.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{AppError, Result};

/// Connector id of the generic injected (`window.ethereum`) provider.
pub const INJECTED_CONNECTOR_ID: &str = "injected";
/// Connector id of the WalletConnect v2 provider.
pub const WALLETCONNECT_CONNECTOR_ID: &str = "walletConnect";

/// Capability tag shared by connectors and wallet options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectorKind {
    Injected,
    WalletConnect,
}

impl ConnectorKind {
    pub fn default_id(&self) -> &'static str {
        match self {
            ConnectorKind::Injected => INJECTED_CONNECTOR_ID,
            ConnectorKind::WalletConnect => WALLETCONNECT_CONNECTOR_ID,
        }
    }
}

/// A registered connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorDescriptor {
    /// Stable identifier (`"injected"`, `"walletConnect"`)
    pub id: String,
    pub name: String,
    pub kind: ConnectorKind,
}

impl ConnectorDescriptor {
    pub fn injected() -> Self {
        Self {
            id: INJECTED_CONNECTOR_ID.to_string(),
            name: "Injected".to_string(),
            kind: ConnectorKind::Injected,
        }
    }

    pub fn wallet_connect() -> Self {
        Self {
            id: WALLETCONNECT_CONNECTOR_ID.to_string(),
            name: "WalletConnect".to_string(),
            kind: ConnectorKind::WalletConnect,
        }
    }

    /// Connectors available for a build. WalletConnect needs a project id.
    pub fn defaults(walletconnect_enabled: bool) -> Vec<Self> {
        let mut connectors = vec![Self::injected()];
        if walletconnect_enabled {
            connectors.push(Self::wallet_connect());
        }
        connectors
    }
}

/// The page the app is served from, needed to build deep links back to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageLocation {
    /// `window.location.host`, e.g. `presale.spraicoin.com`
    pub host: String,
    /// `window.location.href`
    pub href: String,
}

/// Mobile deep link formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeepLink {
    /// Opens the page inside the MetaMask mobile browser
    MetaMaskDapp,
    /// Opens the page inside the Trust Wallet browser on BNB Smart Chain
    TrustOpenUrl,
}

impl DeepLink {
    pub fn render(&self, location: &PageLocation) -> String {
        match self {
            DeepLink::MetaMaskDapp => {
                format!("https://metamask.app.link/dapp/{}", location.host)
            }
            DeepLink::TrustOpenUrl => format!(
                "https://link.trustwallet.com/open_url?coin_id=20000714&url={}",
                urlencoding::encode(&location.href)
            ),
        }
    }
}

/// A branded choice in the wallet modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletOption {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: Option<&'static str>,
    pub deep_link: Option<DeepLink>,
    pub connector: ConnectorKind,
}

const WALLET_OPTIONS: &[WalletOption] = &[
    WalletOption {
        id: "metamask",
        name: "MetaMask",
        icon: "🦊",
        description: None,
        deep_link: Some(DeepLink::MetaMaskDapp),
        connector: ConnectorKind::Injected,
    },
    WalletOption {
        id: "trust",
        name: "Trust Wallet",
        icon: "🛡️",
        description: None,
        deep_link: Some(DeepLink::TrustOpenUrl),
        connector: ConnectorKind::Injected,
    },
    WalletOption {
        id: "walletconnect",
        name: "WalletConnect",
        icon: "📱",
        description: Some("Scan QR code or use mobile wallet"),
        deep_link: None,
        connector: ConnectorKind::WalletConnect,
    },
    WalletOption {
        id: "coinbase",
        name: "Coinbase Wallet",
        icon: "🔵",
        description: None,
        deep_link: None,
        connector: ConnectorKind::Injected,
    },
];

/// Wallet options in display order.
pub fn wallet_options() -> &'static [WalletOption] {
    WALLET_OPTIONS
}

/// Look up a wallet option by id.
pub fn find_wallet_option(id: &str) -> Option<&'static WalletOption> {
    WALLET_OPTIONS.iter().find(|o| o.id == id)
}

/// Resolve the connector for a wallet option.
///
/// WalletConnect options only ever match a WalletConnect connector; every
/// other option takes the first injected connector. A miss is logged and
/// returned as [`AppError::ConnectorNotFound`].
pub fn select_connector<'a>(
    connectors: &'a [ConnectorDescriptor],
    option: &WalletOption,
) -> Result<&'a ConnectorDescriptor> {
    let found = connectors.iter().find(|c| c.kind == option.connector);
    match found {
        Some(connector) => {
            debug!("Wallet option {} -> connector {}", option.name, connector.id);
            Ok(connector)
        }
        None => {
            error!("Connector not found for: {}", option.name);
            Err(AppError::ConnectorNotFound(option.name.to_string()))
        }
    }
}

/// User-agent sniffing for phones and tablets.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    ["iphone", "ipad", "ipod", "android"]
        .iter()
        .any(|needle| ua.contains(needle))
}
