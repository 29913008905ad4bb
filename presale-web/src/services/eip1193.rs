//! EIP-1193 Provider Bridge via wasm-bindgen
//!
//! JavaScript interop for the two connectors: the injected provider
//! (`window.ethereum`, shared by MetaMask, Trust Wallet and Coinbase Wallet)
//! and a WalletConnect v2 `EthereumProvider` session.
//!
//! [`Eip1193Signer`] implements [`WalletSigner`] on top of either one, and
//! [`BrowserSigners`] hands the service a signer for whichever connector is
//! active at purchase time.

use alloy::primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use lib_core::config::AppMetadata;
use lib_core::error::{AppError, Result};
use lib_core::model::ConnectorKind;
use lib_web3::{SignerSource, WalletSigner};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;

/// Delay between `eth_getTransactionReceipt` polls.
const RECEIPT_POLL_MS: u32 = 1_500;

// ============================================================================
// PROVIDER ACCESS (JavaScript Interop)
// ============================================================================

#[wasm_bindgen(inline_js = "
let wcProvider = null;

function walletConnectFactory() {
    const umd = window.WalletConnectEthereumProvider
        || window['@walletconnect/ethereum-provider'];
    if (!umd) {
        return null;
    }
    return umd.EthereumProvider || umd.default || umd;
}

function providerFor(kind) {
    if (kind === 'walletConnect') {
        return wcProvider;
    }
    return typeof window.ethereum !== 'undefined' ? window.ethereum : null;
}

export function hasProvider(kind) {
    return providerFor(kind) !== null;
}

export async function initWalletConnect(projectId, chainId, rpcUrl, metadata) {
    if (wcProvider) {
        return;
    }
    const factory = walletConnectFactory();
    if (!factory) {
        throw new Error('WalletConnect provider script is not loaded');
    }
    const rpcMap = {};
    rpcMap[chainId] = rpcUrl;
    wcProvider = await factory.init({
        projectId: projectId,
        chains: [chainId],
        rpcMap: rpcMap,
        showQrModal: true,
        metadata: metadata,
    });
}

export async function requestAccounts(kind) {
    const provider = providerFor(kind);
    if (!provider) {
        throw new Error('No Ethereum provider found. Please install MetaMask or use WalletConnect.');
    }
    if (kind === 'walletConnect' && !provider.session) {
        await provider.connect();
    }
    const accounts = await provider.request({ method: 'eth_requestAccounts' });
    const chainId = await provider.request({ method: 'eth_chainId' });
    return { accounts: accounts, chainId: String(chainId) };
}

export async function providerRequest(kind, method, params) {
    const provider = providerFor(kind);
    if (!provider) {
        throw new Error('No Ethereum provider found. Please install MetaMask or use WalletConnect.');
    }
    return await provider.request({ method: method, params: params });
}

export function onProviderEvent(kind, event, callback) {
    const provider = providerFor(kind);
    if (provider && typeof provider.on === 'function') {
        provider.on(event, callback);
        return true;
    }
    return false;
}

export async function disconnectProvider(kind) {
    if (kind === 'walletConnect' && wcProvider) {
        await wcProvider.disconnect();
        wcProvider = null;
    }
}
")]
extern "C" {
    /// Whether a provider exists for a connector id
    fn hasProvider(kind: &str) -> bool;

    /// Create the WalletConnect provider once per page
    #[wasm_bindgen(catch)]
    async fn initWalletConnect(
        project_id: &str,
        chain_id: u32,
        rpc_url: &str,
        metadata: JsValue,
    ) -> std::result::Result<JsValue, JsValue>;

    /// `eth_requestAccounts` + `eth_chainId`
    #[wasm_bindgen(catch)]
    async fn requestAccounts(kind: &str) -> std::result::Result<JsValue, JsValue>;

    /// Generic `provider.request({ method, params })`
    #[wasm_bindgen(catch)]
    async fn providerRequest(
        kind: &str,
        method: &str,
        params: JsValue,
    ) -> std::result::Result<JsValue, JsValue>;

    /// `provider.on(event, callback)`; false when the provider has no events
    fn onProviderEvent(kind: &str, event: &str, callback: &js_sys::Function) -> bool;

    #[wasm_bindgen(catch)]
    async fn disconnectProvider(kind: &str) -> std::result::Result<JsValue, JsValue>;
}

// ============================================================================

/// Human-readable message from a thrown JS value.
pub fn js_error_message(error: &JsValue) -> String {
    if let Some(message) = error.as_string() {
        return message;
    }
    js_sys::Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", error))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| AppError::Internal(format!("Cannot convert value for JS: {}", e)))
}

fn from_js<T: for<'de> Deserialize<'de>>(value: JsValue) -> Result<T> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| AppError::Decoding(format!("Unexpected provider response: {}", e)))
}

/// Parse a `0x`-prefixed hex quantity such as an `eth_chainId` result.
pub fn parse_hex_quantity(value: &str) -> Result<u64> {
    let value = value.trim();
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    }
    .map_err(|e| AppError::Decoding(format!("Invalid quantity {}: {}", value, e)))
}

pub fn has_provider(kind: ConnectorKind) -> bool {
    hasProvider(kind.default_id())
}

/// Settings needed to open a WalletConnect session.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletConnectSettings {
    pub project_id: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub metadata: AppMetadata,
}

pub async fn init_wallet_connect(settings: &WalletConnectSettings) -> Result<()> {
    let chain_id = u32::try_from(settings.chain_id)
        .map_err(|_| AppError::Config(format!("Chain id {} out of range", settings.chain_id)))?;
    initWalletConnect(
        &settings.project_id,
        chain_id,
        &settings.rpc_url,
        to_js(&settings.metadata)?,
    )
    .await
    .map(|_| ())
    .map_err(|e| AppError::Connection(js_error_message(&e)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountsResponse {
    accounts: Vec<String>,
    chain_id: String,
}

/// Ask the wallet for account access. Returns the checksummed address and
/// the wallet's current chain id.
pub async fn request_accounts(kind: ConnectorKind) -> Result<(String, u64)> {
    let response = requestAccounts(kind.default_id())
        .await
        .map_err(|e| AppError::Connection(js_error_message(&e)))?;
    let response: AccountsResponse = from_js(response)?;

    let first = response
        .accounts
        .first()
        .ok_or_else(|| AppError::Connection("Wallet returned no accounts".to_string()))?;
    let address = parse_account(first)?;
    let chain_id = parse_hex_quantity(&response.chain_id)?;

    Ok((address.to_checksum(None), chain_id))
}

pub fn parse_account(raw: &str) -> Result<Address> {
    raw.parse::<Address>()
        .map_err(|e| AppError::Decoding(format!("Invalid account {}: {}", raw, e)))
}

pub async fn disconnect(kind: ConnectorKind) -> Result<()> {
    disconnectProvider(kind.default_id())
        .await
        .map(|_| ())
        .map_err(|e| AppError::Connection(js_error_message(&e)))
}

/// Register a provider event listener for the lifetime of the page.
pub fn on_event(kind: ConnectorKind, event: &str, handler: impl FnMut(JsValue) + 'static) -> bool {
    let callback = Closure::<dyn FnMut(JsValue)>::new(handler);
    let registered = onProviderEvent(kind.default_id(), event, callback.as_ref().unchecked_ref());
    // Providers keep their listeners until the page unloads
    callback.forget();
    registered
}

async fn request(kind: ConnectorKind, method: &str, params: Value) -> std::result::Result<Value, String> {
    let params = to_js(&params).map_err(|e| e.to_string())?;
    let result = providerRequest(kind.default_id(), method, params)
        .await
        .map_err(|e| js_error_message(&e))?;
    from_js(result).map_err(|e| e.to_string())
}

fn as_str(value: &Value, method: &str) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::Decoding(format!("{} returned {}", method, value)))
}

// ============================================================================
// SIGNER
// ============================================================================

/// [`WalletSigner`] backed by an EIP-1193 provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eip1193Signer {
    kind: ConnectorKind,
}

impl Eip1193Signer {
    pub fn new(kind: ConnectorKind) -> Self {
        Self { kind }
    }
}

#[async_trait(?Send)]
impl WalletSigner for Eip1193Signer {
    async fn address(&self) -> Result<Address> {
        let accounts = request(self.kind, "eth_accounts", json!([]))
            .await
            .map_err(AppError::Connection)?;
        let first = accounts
            .as_array()
            .and_then(|a| a.first())
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::Connection("Wallet is not connected".to_string()))?;
        parse_account(first)
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let params = json!([{ "to": to, "data": data }, "latest"]);
        let result = request(self.kind, "eth_call", params)
            .await
            .map_err(AppError::Rpc)?;
        as_str(&result, "eth_call")?
            .parse::<Bytes>()
            .map_err(|e| AppError::Decoding(format!("Invalid eth_call result: {}", e)))
    }

    async fn send_transaction(&self, from: Address, to: Address, data: Bytes) -> Result<TxHash> {
        let params = json!([{ "from": from, "to": to, "data": data }]);
        let result = request(self.kind, "eth_sendTransaction", params)
            .await
            .map_err(AppError::Transaction)?;
        as_str(&result, "eth_sendTransaction")?
            .parse::<TxHash>()
            .map_err(|e| AppError::Decoding(format!("Invalid transaction hash: {}", e)))
    }

    async fn wait_for_confirmation(&self, hash: TxHash) -> Result<()> {
        loop {
            let receipt = request(self.kind, "eth_getTransactionReceipt", json!([hash]))
                .await
                .map_err(AppError::Transaction)?;

            if !receipt.is_null() {
                let status = receipt.get("status").and_then(Value::as_str).unwrap_or("0x0");
                return match parse_hex_quantity(status) {
                    Ok(1) => Ok(()),
                    _ => Err(AppError::Transaction(format!("Transaction {} reverted", hash))),
                };
            }

            TimeoutFuture::new(RECEIPT_POLL_MS).await;
        }
    }
}

/// Signer source following the connector the user last connected with.
///
/// Before any connect the injected provider is used when present, so a
/// wallet the browser already authorised can still buy.
#[derive(Clone, Copy)]
pub struct BrowserSigners {
    active: RwSignal<Option<ConnectorKind>>,
}

impl BrowserSigners {
    pub fn new(active: RwSignal<Option<ConnectorKind>>) -> Self {
        Self { active }
    }
}

impl SignerSource for BrowserSigners {
    type Signer = Eip1193Signer;

    fn current_signer(&self) -> Option<Eip1193Signer> {
        let kind = self.active.get_untracked().unwrap_or(ConnectorKind::Injected);
        has_provider(kind).then(|| Eip1193Signer::new(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_quantity() {
        assert_eq!(parse_hex_quantity("0x38").unwrap(), 56);
        assert_eq!(parse_hex_quantity("0x61").unwrap(), 97);
        assert_eq!(parse_hex_quantity("0X1").unwrap(), 1);
        assert_eq!(parse_hex_quantity("56").unwrap(), 56);
        assert!(parse_hex_quantity("0xzz").is_err());
        assert!(parse_hex_quantity("").is_err());
    }

    #[test]
    fn test_parse_account() {
        let address = parse_account("0x8ba1f109551bd432803012645ac136ddd64dba72").unwrap();
        assert_eq!(
            address.to_checksum(None),
            "0x8ba1f109551bD432803012645Ac136ddd64DBA72"
        );
        assert!(matches!(parse_account("0x1234"), Err(AppError::Decoding(_))));
    }
}
