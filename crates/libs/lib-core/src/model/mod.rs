//! # Model
//!
//! Pure state and selection logic. Nothing in here touches the DOM or the
//! network, so the browser app and the tests drive the same code.

// region: --- Modules
pub mod connector;
pub mod modal;
pub mod wallet;
// endregion: --- Modules

// region: --- Re-exports
pub use connector::{
    find_wallet_option, is_mobile_user_agent, select_connector, wallet_options,
    ConnectorDescriptor, ConnectorKind, DeepLink, PageLocation, WalletOption,
};
pub use modal::{
    modal_subtitle, plan_selection, DeepLinkPolicy, ModalEvent, ModalState, SelectionPlan,
    MOBILE_TIP,
};
pub use wallet::{refresh_balances, BalanceReader, WalletAction, WalletState};
// endregion: --- Re-exports
