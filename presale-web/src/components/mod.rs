//! UI Components

pub mod navbar;
pub mod wallet_modal;

pub use navbar::Navbar;
pub use wallet_modal::{provide_wallet_modal, use_wallet_modal, WalletModal};
