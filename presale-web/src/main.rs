//! SPRAI Token Presale - browser dApp
//!
//! Connects a BSC wallet and buys SPRAI with USDT. Everything runs in the
//! browser; signing happens in the user's wallet.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

pub mod app;
pub mod components;
pub mod config;
pub mod pages;
pub mod services;
pub mod state;
pub mod utils;

use app::App;

#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // `tracing` events from the libraries arrive here through its `log` feature
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("SPRAI presale starting");

    hide_loading_screen();

    leptos::mount::mount_to_body(|| view! { <App/> });
}

/// Hide the static loading screen from index.html
fn hide_loading_screen() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("No document available");
        return;
    };

    match document.get_element_by_id("leptos-loading") {
        Some(loading) => {
            if let Some(element) = loading.dyn_ref::<HtmlElement>() {
                if let Err(e) = element.class_list().add_1("hidden") {
                    log::warn!("Failed to hide loading screen: {:?}", e);
                }
            }
        }
        None => log::warn!("Loading element not found"),
    }
}
