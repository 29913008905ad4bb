//! Navigation Bar Component

use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos_router::components::A;
use shared::utils::truncate_address;

use crate::components::wallet_modal::use_wallet_modal;
use crate::services::use_connection_adapter;
use crate::state::wallet::use_wallet_context;

#[component]
pub fn Navbar() -> impl IntoView {
    let wallet = use_wallet_context();
    let modal = use_wallet_modal();
    let adapter = use_connection_adapter();

    let on_disconnect = move |_: MouseEvent| {
        leptos::task::spawn_local(async move {
            adapter.disconnect(wallet).await;
        });
    };

    view! {
        <nav>
            <div style="max-width: 1200px; margin: 0 auto; padding: 0 24px; display: flex; justify-content: space-between; align-items: center;">
                <A href="/" attr:class="nav-title">
                    <span class="accent">"SPRAI"</span>" Presale"
                </A>

                {move || match wallet.address() {
                    Some(address) => view! {
                        <div style="display: flex; gap: var(--spacing-sm); align-items: center;">
                            <span style="font-family: monospace; color: var(--text-secondary);">
                                {truncate_address(&address)}
                            </span>
                            <button class="btn btn-secondary" on:click=on_disconnect>
                                "Disconnect"
                            </button>
                        </div>
                    }.into_any(),
                    None => view! {
                        <button class="btn" on:click=move |_| modal.open()>
                            {move || if adapter.is_pending() { "Connecting..." } else { "Connect Wallet" }}
                        </button>
                    }.into_any(),
                }}
            </div>
        </nav>
    }
}
