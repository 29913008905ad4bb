//! # Core Library
//!
//! Configuration, the application error type, and the UI-independent model:
//! wallet state slice, connector catalogue and the wallet modal state machine.

pub mod config;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::{Config, Network};
pub use error::{AppError, Result};
pub use model::wallet::{WalletAction, WalletState};
