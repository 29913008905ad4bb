//! Presale DTOs

use serde::{Deserialize, Serialize};

/// Snapshot of the presale contract's `getConfig()` view.
///
/// Fetched on demand; nothing caches or invalidates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresaleConfig {
    pub token_price_usdt: String,
    pub min_purchase_usdt: String,
    pub max_purchase_usdt: String,
    pub presale_active: bool,
}

/// Handle for a submitted but not yet confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxHandle {
    /// 0x-prefixed transaction hash
    pub hash: String,
    /// Chain the transaction was submitted on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

impl TxHandle {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            chain_id: None,
        }
    }

    /// Block explorer link for this transaction.
    pub fn explorer_url(&self, explorer_base: &str) -> String {
        format!("{}/tx/{}", explorer_base.trim_end_matches('/'), self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presale_config_json_uses_camel_case() {
        let config = PresaleConfig {
            token_price_usdt: "0.01".to_string(),
            min_purchase_usdt: "10.0".to_string(),
            max_purchase_usdt: "5000.0".to_string(),
            presale_active: false,
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["tokenPriceUsdt"], "0.01");
        assert_eq!(json["presaleActive"], false);
    }

    #[test]
    fn test_tx_handle_skips_missing_chain_id() {
        let handle = TxHandle::new("0xabc");
        let json = serde_json::to_string(&handle).unwrap();
        assert_eq!(json, r#"{"hash":"0xabc"}"#);
    }

    #[test]
    fn test_explorer_url() {
        let handle = TxHandle::new("0xdead");
        assert_eq!(
            handle.explorer_url("https://testnet.bscscan.com/"),
            "https://testnet.bscscan.com/tx/0xdead"
        );
    }
}
