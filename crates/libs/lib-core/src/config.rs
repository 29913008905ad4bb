//! # Application Configuration
//!
//! Network selection, contract addresses and display metadata, read from
//! named variables. The same parser serves two sources:
//!
//! - [`Config::from_env()`] - process environment (plus a `.env` file), used by
//!   native tools and tests
//! - [`Config::from_lookup()`] - any `name -> value` function; the browser app
//!   feeds it values baked in at compile time with `option_env!`
//!
//! Empty values count as unset, so a blank `PRESALE_RPC_URL=` falls back to
//! the network default.
//!
//! ```rust
//! use lib_core::config::{Config, Network};
//!
//! let config = Config::from_lookup(|name| match name {
//!     "PRESALE_NETWORK" => Some("mainnet".to_string()),
//!     "PRESALE_USDT_CONTRACT" => Some("0x55d398326f99059fF775485246999027B3197955".to_string()),
//!     _ => None,
//! })
//! .unwrap();
//!
//! assert_eq!(config.network, Network::Mainnet);
//! assert_eq!(config.chain_id(), 56);
//! assert!(config.presale_contract.is_none());
//! ```

use std::time::Duration;

use alloy_primitives::Address;
use lib_utils::envs::parse_value;
use lib_utils::validation::validate_decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::model::modal::DeepLinkPolicy;

pub const ENV_NETWORK: &str = "PRESALE_NETWORK";
pub const ENV_RPC_URL: &str = "PRESALE_RPC_URL";
pub const ENV_USDT_CONTRACT: &str = "PRESALE_USDT_CONTRACT";
pub const ENV_PRESALE_CONTRACT: &str = "PRESALE_CONTRACT";
pub const ENV_WALLETCONNECT_PROJECT_ID: &str = "WALLETCONNECT_PROJECT_ID";
pub const ENV_WEBSITE_URL: &str = "PRESALE_WEBSITE_URL";
pub const ENV_TOKEN_PRICE_USDT: &str = "PRESALE_TOKEN_PRICE_USDT";
pub const ENV_DEEP_LINK_FALLBACK_MS: &str = "PRESALE_DEEP_LINK_FALLBACK_MS";

const DEFAULT_WEBSITE_URL: &str = "https://spraicoin.com";
const DEFAULT_ICON_URL: &str = "https://spraicoin.com/logo.png";
const DEFAULT_TOKEN_PRICE_USDT: &str = "0.01";
const DEFAULT_DEEP_LINK_FALLBACK_MS: u64 = 1500;

/// USDT and SPRAI on BSC both use 18 decimals.
pub const TOKEN_DECIMALS: u8 = 18;

/// Target chain.
///
/// The presale runs on BNB Smart Chain; the test build points at its testnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// BNB Smart Chain (chain id 56)
    Mainnet,
    /// BNB Smart Chain testnet (chain id 97)
    Testnet,
}

impl Network {
    /// Parse the `PRESALE_NETWORK` flag. Anything other than `mainnet`
    /// (case-insensitive) selects the testnet.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag.map(|f| f.trim().to_ascii_lowercase()) {
            Some(f) if f == "mainnet" || f == "true" => Network::Mainnet,
            _ => Network::Testnet,
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 56,
            Network::Testnet => 97,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "BNB Smart Chain",
            Network::Testnet => "BNB Smart Chain Testnet",
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://bsc-dataseed.binance.org",
            Network::Testnet => "https://data-seed-prebsc-1-s1.binance.org:8545",
        }
    }

    pub fn explorer_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://bscscan.com",
            Network::Testnet => "https://testnet.bscscan.com",
        }
    }
}

/// Display metadata handed to WalletConnect so wallets can show who is asking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppMetadata {
    pub name: String,
    pub description: String,
    pub url: String,
    pub icons: Vec<String>,
}

impl AppMetadata {
    fn for_website(url: String) -> Self {
        Self {
            name: "SPRAI Token Presale".to_string(),
            description: "Buy SPRAI tokens with USDT on BSC".to_string(),
            url,
            icons: vec![DEFAULT_ICON_URL.to_string()],
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Main or test chain
    pub network: Network,

    /// JSON-RPC endpoint used for read-only calls
    pub rpc_url: String,

    /// USDT (BEP-20) token contract
    pub usdt_contract: Address,

    /// Presale contract; reads and purchases fail with a configuration
    /// error while this is unset
    pub presale_contract: Option<Address>,

    /// WalletConnect Cloud project id; the WalletConnect connector is only
    /// registered when this is present
    pub walletconnect_project_id: Option<String>,

    pub metadata: AppMetadata,

    /// Fixed SPRAI price in USDT (decimal string) used for the local
    /// purchase estimate
    pub token_price_usdt: String,

    /// How long the wallet modal waits after a mobile deep link before it
    /// invokes the connector anyway
    pub deep_link_fallback: Duration,
}

impl Config {
    /// Load configuration from the process environment (and `.env`).
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }
        let config = Self::from_lookup(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from an arbitrary `name -> value` lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let get = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());

        let network = Network::from_flag(get(ENV_NETWORK).as_deref());

        let rpc_url = get(ENV_RPC_URL).unwrap_or_else(|| network.default_rpc_url().to_string());

        let usdt_raw = get(ENV_USDT_CONTRACT).ok_or_else(|| {
            AppError::Config(format!("{} must be set in environment", ENV_USDT_CONTRACT))
        })?;
        let usdt_contract = parse_address(ENV_USDT_CONTRACT, &usdt_raw)?;

        let presale_contract = match get(ENV_PRESALE_CONTRACT) {
            Some(raw) => Some(parse_address(ENV_PRESALE_CONTRACT, &raw)?),
            None => {
                warn!("{} is not set; purchases are disabled", ENV_PRESALE_CONTRACT);
                None
            }
        };

        let walletconnect_project_id = get(ENV_WALLETCONNECT_PROJECT_ID);

        let website_url = get(ENV_WEBSITE_URL).unwrap_or_else(|| DEFAULT_WEBSITE_URL.to_string());

        let token_price_usdt = get(ENV_TOKEN_PRICE_USDT)
            .map(|raw| raw.trim().to_string())
            .unwrap_or_else(|| DEFAULT_TOKEN_PRICE_USDT.to_string());

        let fallback_ms = match get(ENV_DEEP_LINK_FALLBACK_MS) {
            Some(raw) => parse_value::<u64>(ENV_DEEP_LINK_FALLBACK_MS, &raw)?,
            None => DEFAULT_DEEP_LINK_FALLBACK_MS,
        };

        Ok(Self {
            network,
            rpc_url,
            usdt_contract,
            presale_contract,
            walletconnect_project_id,
            metadata: AppMetadata::for_website(website_url),
            token_price_usdt,
            deep_link_fallback: Duration::from_millis(fallback_ms),
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        validate_decimal(&self.token_price_usdt, TOKEN_DECIMALS as usize, ENV_TOKEN_PRICE_USDT)
            .map_err(AppError::Config)?;
        if !self.token_price_usdt.chars().any(|c| c.is_ascii_digit() && c != '0') {
            return Err(AppError::Config(format!(
                "{} must be greater than zero",
                ENV_TOKEN_PRICE_USDT
            )));
        }

        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "{} must be an http(s) URL",
                ENV_RPC_URL
            )));
        }

        if self.usdt_contract == Address::ZERO {
            return Err(AppError::Config(format!(
                "{} must not be the zero address",
                ENV_USDT_CONTRACT
            )));
        }

        Ok(())
    }

    pub fn chain_id(&self) -> u64 {
        self.network.chain_id()
    }

    pub fn deep_link_policy(&self) -> DeepLinkPolicy {
        DeepLinkPolicy::new(self.deep_link_fallback)
    }
}

fn parse_address(name: &'static str, raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| AppError::Config(format!("{} is not a valid address: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const USDT: &str = "0x337610d27c682E347C9cD60BD4b3b107C9d34dDd";
    const PRESALE: &str = "0x8ba1f109551bD432803012645Ac136ddd64DBA72";

    fn lookup(vars: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_select_testnet() {
        let config = Config::from_lookup(lookup(&[(ENV_USDT_CONTRACT, USDT)])).unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.chain_id(), 97);
        assert_eq!(config.rpc_url, Network::Testnet.default_rpc_url());
        assert_eq!(config.token_price_usdt, "0.01");
        assert_eq!(config.deep_link_fallback, Duration::from_millis(1500));
        assert_eq!(config.metadata.url, "https://spraicoin.com");
        assert!(config.walletconnect_project_id.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_mainnet_config() {
        let config = Config::from_lookup(lookup(&[
            (ENV_NETWORK, "MAINNET"),
            (ENV_RPC_URL, "https://rpc.example.org"),
            (ENV_USDT_CONTRACT, USDT),
            (ENV_PRESALE_CONTRACT, PRESALE),
            (ENV_WALLETCONNECT_PROJECT_ID, "abc123"),
            (ENV_TOKEN_PRICE_USDT, "0.05"),
            (ENV_DEEP_LINK_FALLBACK_MS, "2500"),
        ]))
        .unwrap();

        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.rpc_url, "https://rpc.example.org");
        assert_eq!(config.presale_contract, Some(PRESALE.parse::<Address>().unwrap()));
        assert_eq!(config.walletconnect_project_id.as_deref(), Some("abc123"));
        assert_eq!(config.token_price_usdt, "0.05");
        assert_eq!(config.deep_link_fallback, Duration::from_millis(2500));
        assert_eq!(config.deep_link_policy().fallback_delay, Duration::from_millis(2500));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = Config::from_lookup(lookup(&[
            (ENV_USDT_CONTRACT, USDT),
            (ENV_RPC_URL, "  "),
            (ENV_PRESALE_CONTRACT, ""),
        ]))
        .unwrap();
        assert_eq!(config.rpc_url, Network::Testnet.default_rpc_url());
        assert!(config.presale_contract.is_none());
    }

    #[test]
    fn test_missing_usdt_contract() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains(ENV_USDT_CONTRACT)));
    }

    #[test]
    fn test_bad_address_rejected() {
        let err = Config::from_lookup(lookup(&[(ENV_USDT_CONTRACT, "0x1234")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        let mut config = Config::from_lookup(lookup(&[(ENV_USDT_CONTRACT, USDT)])).unwrap();
        config.token_price_usdt = "0.00".to_string();
        assert!(config.validate().is_err());
        config.token_price_usdt = "abc".to_string();
        assert!(config.validate().is_err());
        config.token_price_usdt = "0.5".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_network_flag_parsing() {
        assert_eq!(Network::from_flag(Some("mainnet")), Network::Mainnet);
        assert_eq!(Network::from_flag(Some("true")), Network::Mainnet);
        assert_eq!(Network::from_flag(Some("testnet")), Network::Testnet);
        assert_eq!(Network::from_flag(None), Network::Testnet);
    }
}
