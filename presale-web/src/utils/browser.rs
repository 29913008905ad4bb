//! Browser environment helpers

use lib_core::model::{is_mobile_user_agent, PageLocation};
use web_sys::window;

/// Where this page is served from, for deep links back into it.
pub fn page_location() -> PageLocation {
    let Some(location) = window().map(|w| w.location()) else {
        return PageLocation::default();
    };
    PageLocation {
        host: location.host().unwrap_or_default(),
        href: location.href().unwrap_or_default(),
    }
}

pub fn is_mobile() -> bool {
    window()
        .and_then(|w| w.navigator().user_agent().ok())
        .map(|ua| is_mobile_user_agent(&ua))
        .unwrap_or(false)
}

/// Navigate the current tab (used for wallet app universal links).
pub fn navigate_to(url: &str) {
    let Some(window) = window() else {
        return;
    };
    if let Err(e) = window.location().set_href(url) {
        log::warn!("Navigation to {} failed: {:?}", url, e);
    }
}
