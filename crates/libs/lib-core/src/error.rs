//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] used by the
//! configuration layer, the contract service and the browser app.
//!
//! ## Error Categories
//!
//! 1. **Configuration errors** - fatal to the calling operation, never retried
//!    - [`Config`](AppError::Config)
//!
//! 2. **Connectivity errors** - the user has to change something (install a
//!    wallet, pick another option)
//!    - [`NoProvider`](AppError::NoProvider)
//!    - [`ConnectorNotFound`](AppError::ConnectorNotFound)
//!    - [`Connection`](AppError::Connection)
//!
//! 3. **Read errors** - swallowed by balance reads, surfaced by config reads
//!    - [`Rpc`](AppError::Rpc) / [`Decoding`](AppError::Decoding)
//!
//! 4. **Write errors** - approve or buy failed or was rejected; propagated as-is
//!    - [`Transaction`](AppError::Transaction)
//!
//! A rejected signature request and a node failure both end up in
//! [`Transaction`](AppError::Transaction); nothing distinguishes them.
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn require_presale(addr: Option<&str>) -> Result<&str> {
//!     addr.ok_or_else(|| AppError::Config("Presale contract not configured".to_string()))
//! }
//!
//! assert!(require_presale(None).is_err());
//! ```

use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Missing or malformed configuration (e.g. no presale contract address).
    #[error("Configuration error: {0}")]
    Config(String),

    /// No injected wallet and no WalletConnect session to sign with.
    #[error("No Ethereum provider found. Please install MetaMask or use WalletConnect.")]
    NoProvider,

    /// A wallet option did not resolve to any registered connector.
    #[error("Connector not found for {0}")]
    ConnectorNotFound(String),

    /// The wallet refused or failed the connect handshake.
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON-RPC / node failure on a read path.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Approve or buy transaction failed, reverted or was rejected.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Invalid user input (amounts, addresses).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed data coming back from the wallet or the node.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Unexpected failures.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get a user-friendly error message for the UI.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NoProvider => self.to_string(),
            AppError::ConnectorNotFound(name) => {
                format!("{} is not available in this browser", name)
            }
            AppError::Connection(msg)
            | AppError::Transaction(msg)
            | AppError::InvalidInput(msg) => msg.clone(),
            AppError::Config(msg) => msg.clone(),
            AppError::Rpc(_) => "Network temporarily unavailable".to_string(),
            AppError::Decoding(_) | AppError::Internal(_) => {
                "An internal error occurred".to_string()
            }
        }
    }

    /// Short variant name, used as a structured field in logs.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Config",
            AppError::NoProvider => "NoProvider",
            AppError::ConnectorNotFound(_) => "ConnectorNotFound",
            AppError::Connection(_) => "Connection",
            AppError::Rpc(_) => "Rpc",
            AppError::Transaction(_) => "Transaction",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Decoding(_) => "Decoding",
            AppError::Internal(_) => "Internal",
        }
    }
}

/// Convert environment lookup failures to `AppError`.
impl From<lib_utils::envs::Error> for AppError {
    fn from(err: lib_utils::envs::Error) -> Self {
        match err {
            lib_utils::envs::Error::MissingEnv(name) => {
                AppError::Config(format!("{} must be set in environment", name))
            }
            lib_utils::envs::Error::WrongFormat(name) => {
                AppError::Config(format!("{} has an invalid format", name))
            }
        }
    }
}
