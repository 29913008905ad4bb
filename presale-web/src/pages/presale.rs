//! Presale Page - presale terms, USDT balance and the purchase form

use leptos::ev::MouseEvent;
use leptos::prelude::*;
use lib_core::config::Config;
use lib_web3::check_purchase_amount;
use shared::dto::{PresaleConfig, TxHandle};

use crate::components::use_wallet_modal;
use crate::services::use_service_context;
use crate::state::wallet::use_wallet_context;
use crate::utils::format::{format_purchase_limits, format_token_display};

#[component]
pub fn PresalePage() -> impl IntoView {
    let wallet = use_wallet_context();
    let modal = use_wallet_modal();
    let config = expect_context::<Config>();
    let services = use_service_context();

    let (terms, set_terms) = signal(None::<Result<PresaleConfig, String>>);
    let (amount, set_amount) = signal(String::new());
    let (purchasing, set_purchasing) = signal(false);
    let (purchase_error, set_purchase_error) = signal(None::<String>);
    let (last_tx, set_last_tx) = signal(None::<TxHandle>);

    let expected_chain_id = config.chain_id();
    let network_name = config.network.name();
    let explorer_url = config.network.explorer_url();

    // Load presale terms on mount
    leptos::task::spawn_local(async move {
        let result = services
            .get()
            .get_presale_config()
            .await
            .map_err(|e| e.user_message());
        if let Err(e) = &result {
            log::error!("Failed to load presale config: {}", e);
        }
        set_terms.set(Some(result));
    });

    let estimate = move || services.get().calculate_sprai_amount(&amount.get());

    // None while the input is empty, so the form starts without an error
    let validation = move || {
        let amount = amount.get();
        if amount.trim().is_empty() {
            return None;
        }
        terms.with(|terms| match terms {
            Some(Ok(terms)) => check_purchase_amount(&amount, terms)
                .err()
                .map(|e| e.user_message()),
            _ => None,
        })
    };

    let wrong_network = move || wallet.is_wrong_network(expected_chain_id);

    let can_buy = move || {
        wallet.is_connected()
            && !wrong_network()
            && !purchasing.get()
            && !amount.get().trim().is_empty()
            && validation().is_none()
            && matches!(terms.get(), Some(Ok(_)))
    };

    let on_buy = move |_: MouseEvent| {
        // One purchase at a time
        if purchasing.get_untracked() {
            return;
        }
        let service = services.get();
        let usdt_amount = amount.get_untracked();
        set_purchasing.set(true);
        set_purchase_error.set(None);
        set_last_tx.set(None);

        leptos::task::spawn_local(async move {
            match service.buy_tokens(&usdt_amount).await {
                Ok(handle) => {
                    log::info!("Purchase submitted: {}", handle.hash);
                    set_last_tx.set(Some(handle));
                    set_amount.set(String::new());
                    if let Some(address) = wallet.wallet.with_untracked(|s| s.address.clone()) {
                        wallet.refresh_balances(service, address);
                    }
                }
                Err(e) => {
                    log::error!("Purchase failed [{}]: {}", e.code(), e);
                    set_purchase_error.set(Some(e.user_message()));
                }
            }
            set_purchasing.set(false);
        });
    };

    let on_refresh = move |_: MouseEvent| {
        if let Some(address) = wallet.wallet.with_untracked(|s| s.address.clone()) {
            wallet.refresh_balances(services.get(), address);
        }
    };

    view! {
        <div style="display: flex; justify-content: center; padding: var(--spacing-xl) var(--spacing-md);">
            <div class="card" style="width: 100%; max-width: 520px;">
                <h1 style="margin-top: 0;">"Buy SPRAI"</h1>
                <p style="color: var(--text-secondary);">"Pay with USDT on " {network_name}</p>

                <Show when=wrong_network>
                    <div class="banner-warning">
                        "Your wallet is on another network. Switch to " {network_name} " to buy."
                    </div>
                </Show>

                // Presale terms
                {move || match terms.get() {
                    None => view! {
                        <p style="color: var(--text-secondary);">"Loading presale details..."</p>
                    }.into_any(),
                    Some(Err(e)) => view! { <div class="banner-error">{e}</div> }.into_any(),
                    Some(Ok(t)) => view! {
                        <div style="margin-bottom: var(--spacing-lg);">
                            <p>"Price: " {format_token_display(&t.token_price_usdt, 6)} " USDT"</p>
                            <p>"Limits: " {format_purchase_limits(&t.min_purchase_usdt, &t.max_purchase_usdt)}</p>
                            {(!t.presale_active).then(|| view! {
                                <div class="banner-warning">"The presale is not active right now."</div>
                            })}
                        </div>
                    }.into_any(),
                }}

                // Balance
                <Show when=move || wallet.is_connected()>
                    <div style="display: flex; justify-content: space-between; align-items: center; margin-bottom: var(--spacing-md);">
                        <span style="color: var(--text-secondary);">
                            "USDT balance: " {move || format_token_display(&wallet.usdt_balance(), 2)}
                        </span>
                        <button class="btn btn-secondary" on:click=on_refresh>"Refresh"</button>
                    </div>
                </Show>

                // Purchase form
                <label style="display: block; color: var(--text-secondary); margin-bottom: var(--spacing-sm);">
                    "Amount (USDT)"
                </label>
                <input
                    class="input"
                    type="text"
                    inputmode="decimal"
                    placeholder="0.0"
                    prop:value=amount
                    on:input=move |ev| set_amount.set(event_target_value(&ev))
                />
                <p style="color: var(--text-secondary);">
                    "You receive about " {move || format_token_display(&estimate(), 2)} " SPRAI"
                </p>

                {move || validation().map(|msg| view! { <div class="banner-error">{msg}</div> })}
                {move || purchase_error.get().map(|msg| view! { <div class="banner-error">{msg}</div> })}

                {move || if wallet.is_connected() {
                    view! {
                        <button class="btn" style="width: 100%;" disabled=move || !can_buy() on:click=on_buy>
                            {move || if purchasing.get() { "Confirm in your wallet..." } else { "Buy SPRAI" }}
                        </button>
                    }.into_any()
                } else {
                    view! {
                        <button class="btn" style="width: 100%;" on:click=move |_| modal.open()>
                            "Connect Wallet"
                        </button>
                    }.into_any()
                }}

                {move || last_tx.get().map(|tx| {
                    let url = tx.explorer_url(explorer_url);
                    view! {
                        <p style="margin-top: var(--spacing-lg); word-break: break-all;">
                            "Transaction submitted: "
                            <a href=url target="_blank" rel="noopener">{tx.hash.clone()}</a>
                        </p>
                    }
                })}
            </div>
        </div>
    }
}
