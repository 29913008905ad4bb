//! Wallet Selection Modal
//!
//! Drives [`ModalState`] from the UI. Selecting an option awaits the
//! connect future directly; on mobile the wallet app's universal link is
//! opened first and the connector is invoked after the
//! [`DeepLinkPolicy`](lib_core::model::DeepLinkPolicy) delay.

use leptos::ev::MouseEvent;
use leptos::prelude::*;
use lib_core::config::Config;
use lib_core::model::{
    modal_subtitle, plan_selection, wallet_options, ModalEvent, ModalState, WalletAction,
    WalletOption, MOBILE_TIP,
};

use crate::services::{use_connection_adapter, use_service_context};
use crate::state::wallet::use_wallet_context;
use crate::utils::browser::{is_mobile, navigate_to, page_location};

#[derive(Clone, Copy)]
pub struct WalletModalContext {
    pub state: RwSignal<ModalState>,
}

impl WalletModalContext {
    pub fn send(&self, event: ModalEvent) {
        self.state
            .update(|state| *state = std::mem::take(state).on(event));
    }

    pub fn open(&self) {
        self.send(ModalEvent::Open);
    }
}

pub fn provide_wallet_modal() -> WalletModalContext {
    let context = WalletModalContext {
        state: RwSignal::new(ModalState::Closed),
    };
    provide_context(context);
    context
}

pub fn use_wallet_modal() -> WalletModalContext {
    expect_context::<WalletModalContext>()
}

#[component]
pub fn WalletModal() -> impl IntoView {
    let modal = use_wallet_modal();
    let wallet = use_wallet_context();
    let adapter = use_connection_adapter();
    let services = use_service_context();
    let config = expect_context::<Config>();
    let policy = config.deep_link_policy();
    let mobile = is_mobile();

    let select = move |option: &'static WalletOption| {
        if modal.state.get_untracked().is_pending() {
            return;
        }
        modal.send(ModalEvent::Select(option.id));

        let plan = plan_selection(option, mobile, &page_location(), &policy);
        log::info!("Selected {} (deep link: {:?})", option.name, plan.deep_link);

        leptos::task::spawn_local(async move {
            if let Some(link) = plan.deep_link.as_deref() {
                navigate_to(link);
            }
            if let Some(wait) = plan.wait {
                let millis = u32::try_from(wait.as_millis()).unwrap_or(u32::MAX);
                gloo_timers::future::TimeoutFuture::new(millis).await;
            }

            match adapter.connect(option).await {
                Ok((address, chain_id)) => {
                    // Sync even if the modal was cancelled meanwhile
                    wallet.dispatch(WalletAction::Sync {
                        address: address.clone(),
                        chain_id,
                    });
                    wallet.refresh_balances(services.get(), address);
                    adapter.subscribe(wallet, move |address| {
                        wallet.refresh_balances(services.get(), address);
                    });
                    modal.send(ModalEvent::Succeeded);
                }
                Err(e) => modal.send(ModalEvent::Failed(e.user_message())),
            }
        });
    };

    let cancel = move |_: MouseEvent| modal.send(ModalEvent::Cancel);

    view! {
        <Show when=move || modal.state.with(ModalState::is_open)>
            <div class="modal-backdrop" on:click=cancel>
                // Clicks inside the card must not reach the backdrop
                <div class="card modal" on:click=|ev: MouseEvent| ev.stop_propagation()>
                    <h2 style="margin-top: 0;">"Connect Wallet"</h2>
                    <p style="color: var(--text-secondary); margin-bottom: var(--spacing-lg);">
                        {modal_subtitle(mobile)}
                    </p>

                    {move || {
                        modal.state.with(|state| state.error().map(str::to_string)).map(|error| {
                            view! { <div class="banner-error">{error}</div> }
                        })
                    }}

                    {wallet_options()
                        .iter()
                        .map(|option| {
                            let pending = move || modal.state.with(ModalState::is_pending);
                            let spinning = move || {
                                modal.state.with(|state| {
                                    matches!(state, ModalState::Connecting { option_id } if *option_id == option.id)
                                })
                            };
                            view! {
                                <button
                                    class="wallet-option"
                                    disabled=pending
                                    on:click=move |_| select(option)
                                >
                                    <span style="font-size: 24px;">{option.icon}</span>
                                    <span>
                                        <strong>{option.name}</strong>
                                        {option.description.map(|d| view! {
                                            <span style="display: block; color: var(--text-secondary); font-size: 0.85em;">
                                                {d}
                                            </span>
                                        })}
                                    </span>
                                    <Show when=spinning>
                                        <span class="spinner"></span>
                                    </Show>
                                </button>
                            }
                        })
                        .collect_view()}

                    {mobile.then(|| view! {
                        <p style="color: var(--text-secondary); font-size: 0.85em;">
                            <strong>"Mobile tip:"</strong>
                            " " {MOBILE_TIP}
                        </p>
                    })}

                    <button
                        class="btn btn-secondary"
                        style="width: 100%; margin-top: var(--spacing-md);"
                        on:click=cancel
                    >
                        "Cancel"
                    </button>
                </div>
            </div>
        </Show>
    }
}
