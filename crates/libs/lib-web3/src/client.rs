//! # BSC JSON-RPC Reader
//!
//! Read-only contract access over plain JSON-RPC. No wallet is involved, so
//! balances and presale terms load before the user connects.
//!
//! ## RPC Endpoints
//!
//! ### Mainnet
//! - URL: `https://bsc-dataseed.binance.org`
//! - Chain id: 56
//!
//! ### Testnet
//! - URL: `https://data-seed-prebsc-1-s1.binance.org:8545`
//! - Chain id: 97
//!
//! Either can be overridden with `PRESALE_RPC_URL`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lib_web3::client::{ChainReader, RpcReader};
//!
//! # async fn example() -> lib_core::Result<()> {
//! let reader = RpcReader::new("https://data-seed-prebsc-1-s1.binance.org:8545")?;
//! let usdt = "0x337610d27c682E347C9cD60BD4b3b107C9d34dDd".parse().unwrap();
//! let owner = "0x8ba1f109551bD432803012645Ac136ddd64DBA72".parse().unwrap();
//! let balance = reader.token_balance(usdt, owner).await?;
//! println!("raw balance: {}", balance);
//! # Ok(())
//! # }
//! ```

use alloy::primitives::{Address, U256};
use alloy::providers::RootProvider;
use async_trait::async_trait;
use lib_core::error::{AppError, Result};
use tracing::{debug, instrument};

use crate::contracts::{IPresale, IUsdt};

/// Presale terms as stored on chain, in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnChainPresaleConfig {
    pub price: U256,
    pub min_purchase: U256,
    pub max_purchase: U256,
    pub active: bool,
}

/// Read side of the chain the service depends on.
#[async_trait(?Send)]
pub trait ChainReader {
    /// ERC-20 `balanceOf(owner)` on `token`.
    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256>;

    /// `getConfig()` on the presale contract.
    async fn presale_config(&self, presale: Address) -> Result<OnChainPresaleConfig>;

    /// `calculateSpraiAmount(usdt_amount)` on the presale contract.
    async fn quote_sprai(&self, presale: Address, usdt_amount: U256) -> Result<U256>;
}

/// [`ChainReader`] backed by an HTTP JSON-RPC endpoint.
#[derive(Clone)]
pub struct RpcReader {
    provider: RootProvider,
    rpc_url: String,
}

impl RpcReader {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url = rpc_url
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;

        debug!("RPC reader using {}", rpc_url);

        Ok(Self {
            provider: RootProvider::new_http(url),
            rpc_url: rpc_url.to_string(),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

fn rpc_error(method: &str, e: impl std::fmt::Display) -> AppError {
    AppError::Rpc(format!("{} failed: {}", method, e))
}

#[async_trait(?Send)]
impl ChainReader for RpcReader {
    #[instrument(skip(self))]
    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256> {
        IUsdt::new(token, &self.provider)
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| rpc_error("balanceOf", e))
    }

    #[instrument(skip(self))]
    async fn presale_config(&self, presale: Address) -> Result<OnChainPresaleConfig> {
        let config = IPresale::new(presale, &self.provider)
            .getConfig()
            .call()
            .await
            .map_err(|e| rpc_error("getConfig", e))?;

        Ok(OnChainPresaleConfig {
            price: config.price,
            min_purchase: config.minPurchase,
            max_purchase: config.maxPurchase,
            active: config.active,
        })
    }

    #[instrument(skip(self))]
    async fn quote_sprai(&self, presale: Address, usdt_amount: U256) -> Result<U256> {
        IPresale::new(presale, &self.provider)
            .calculateSpraiAmount(usdt_amount)
            .call()
            .await
            .map_err(|e| rpc_error("calculateSpraiAmount", e))
    }
}
