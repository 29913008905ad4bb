//! Build-time configuration
//!
//! A browser has no process environment, so the variables are captured
//! with `option_env!` when the WASM bundle is compiled (e.g.
//! `PRESALE_USDT_CONTRACT=0x... trunk build --release`) and fed to
//! [`Config::from_lookup`].

use lib_core::config::{
    Config, ENV_DEEP_LINK_FALLBACK_MS, ENV_NETWORK, ENV_PRESALE_CONTRACT, ENV_RPC_URL,
    ENV_TOKEN_PRICE_USDT, ENV_USDT_CONTRACT, ENV_WALLETCONNECT_PROJECT_ID, ENV_WEBSITE_URL,
};
use lib_core::error::Result;

fn build_env(name: &str) -> Option<&'static str> {
    match name {
        ENV_NETWORK => option_env!("PRESALE_NETWORK"),
        ENV_RPC_URL => option_env!("PRESALE_RPC_URL"),
        ENV_USDT_CONTRACT => option_env!("PRESALE_USDT_CONTRACT"),
        ENV_PRESALE_CONTRACT => option_env!("PRESALE_CONTRACT"),
        ENV_WALLETCONNECT_PROJECT_ID => option_env!("WALLETCONNECT_PROJECT_ID"),
        ENV_WEBSITE_URL => option_env!("PRESALE_WEBSITE_URL"),
        ENV_TOKEN_PRICE_USDT => option_env!("PRESALE_TOKEN_PRICE_USDT"),
        ENV_DEEP_LINK_FALLBACK_MS => option_env!("PRESALE_DEEP_LINK_FALLBACK_MS"),
        _ => None,
    }
}

/// Load and validate the configuration baked into this build.
pub fn load() -> Result<Config> {
    let config = Config::from_lookup(|name| build_env(name).map(str::to_string))?;
    config.validate()?;
    log::info!(
        "Configured for {} (chain {})",
        config.network.name(),
        config.chain_id()
    );
    Ok(config)
}
