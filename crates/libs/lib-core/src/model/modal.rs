//! # Wallet Modal State Machine
//!
//! ```text
//!            Open                 Select(option)
//!  Closed ---------> Idle{err} ------------------> Connecting{option}
//!    ^                 ^  |                          |    |
//!    |     Cancel      |  | Succeeded     Failed(e)  |    | Succeeded
//!    +-----------------+--+--------> Idle{Some(e)} <-+    v
//!    +---------------------------------------- ClosedBySuccess
//! ```
//!
//! Cancel (button or backdrop) only hides the modal. An in-flight connect
//! attempt keeps running; if it succeeds later the wallet state still syncs,
//! but the modal stays closed.

use std::time::Duration;

use super::connector::{ConnectorKind, PageLocation, WalletOption};

/// Default wait between a mobile deep link and the connector fallback.
pub const DEFAULT_DEEP_LINK_FALLBACK: Duration = Duration::from_millis(1500);

/// Best-effort fallback window for mobile deep links.
///
/// After navigating to a wallet app's universal link the modal waits
/// `fallback_delay` and then invokes the connector anyway, in case the
/// wallet app never took over. Nothing guarantees the app opened, or that
/// the page is still alive when the delay expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeepLinkPolicy {
    pub fallback_delay: Duration,
}

impl Default for DeepLinkPolicy {
    fn default() -> Self {
        Self {
            fallback_delay: DEFAULT_DEEP_LINK_FALLBACK,
        }
    }
}

impl DeepLinkPolicy {
    pub fn new(fallback_delay: Duration) -> Self {
        Self { fallback_delay }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    /// Open, waiting for a choice; carries the last connect error
    Idle { error: Option<String> },
    /// A connect attempt for `option_id` is in flight
    Connecting { option_id: &'static str },
    ClosedBySuccess,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    Open,
    Select(&'static str),
    Succeeded,
    Failed(String),
    /// Cancel button or backdrop click
    Cancel,
}

impl ModalState {
    pub fn on(self, event: ModalEvent) -> ModalState {
        use ModalEvent as E;
        use ModalState as S;

        match (self, event) {
            (S::Closed | S::ClosedBySuccess, E::Open) => S::Idle { error: None },
            (S::Idle { .. }, E::Select(option_id)) => S::Connecting { option_id },
            (S::Idle { .. } | S::Connecting { .. }, E::Succeeded) => S::ClosedBySuccess,
            (S::Connecting { .. }, E::Failed(error)) => S::Idle { error: Some(error) },
            (S::Idle { .. } | S::Connecting { .. }, E::Cancel) => S::Closed,
            // Options are disabled while connecting; late results after a
            // cancel do not reopen the modal
            (state, _) => state,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Idle { .. } | ModalState::Connecting { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ModalState::Connecting { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ModalState::Idle { error } => error.as_deref(),
            _ => None,
        }
    }
}

/// What to do when a wallet option is clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPlan {
    /// Navigate here first (mobile only)
    pub deep_link: Option<String>,
    /// Then wait this long before invoking the connector
    pub wait: Option<Duration>,
    pub connector: ConnectorKind,
}

/// Plan the side effects of selecting `option`.
///
/// Deep links are only followed on mobile devices and never for
/// WalletConnect, which brings its own QR/mobile flow.
pub fn plan_selection(
    option: &WalletOption,
    is_mobile: bool,
    location: &PageLocation,
    policy: &DeepLinkPolicy,
) -> SelectionPlan {
    let deep_link = option
        .deep_link
        .filter(|_| is_mobile && option.connector != ConnectorKind::WalletConnect)
        .map(|link| link.render(location));

    let wait = deep_link.as_ref().map(|_| policy.fallback_delay);

    SelectionPlan {
        deep_link,
        wait,
        connector: option.connector,
    }
}

/// Shown under "Mobile tip:" when the page runs on a phone.
pub const MOBILE_TIP: &str =
    "If your wallet doesn't open, try using WalletConnect to scan the QR code from your wallet app.";

pub fn modal_subtitle(is_mobile: bool) -> &'static str {
    if is_mobile {
        "Select your wallet to connect"
    } else {
        "Connect with browser wallet or scan QR code"
    }
}
