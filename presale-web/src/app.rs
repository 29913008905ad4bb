//! SPRAI Presale Web App - Leptos Frontend

use leptos::prelude::*;
use leptos_router::{
    components::{Route, Router, Routes, A},
    path,
};

use crate::components::{provide_wallet_modal, Navbar, WalletModal};
use crate::pages::PresalePage;
use crate::services::{provide_connection_adapter, provide_service_context};
use crate::state::wallet::provide_wallet_context;

#[component]
pub fn App() -> impl IntoView {
    let config = match crate::config::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return view! { <ConfigError message=e.user_message()/> }.into_any();
        }
    };

    provide_context(config.clone());
    provide_wallet_context();
    provide_wallet_modal();
    let adapter = provide_connection_adapter(&config);
    if let Err(e) = provide_service_context(&config, adapter) {
        log::error!("Failed to create contract service: {}", e);
        return view! { <ConfigError message=e.user_message()/> }.into_any();
    }

    view! {
        <Router>
            <div class="app-container">
                <Navbar/>
                <WalletModal/>
                <Routes fallback=|| view! { <NotFound/> }>
                    <Route path=path!("/") view=PresalePage/>
                </Routes>
            </div>
        </Router>
    }
    .into_any()
}

#[component]
fn ConfigError(message: String) -> impl IntoView {
    view! {
        <div style="display: flex; justify-content: center; align-items: center; min-height: 100vh;">
            <div class="card" style="max-width: 500px; text-align: center;">
                <h1 style="margin-bottom: 16px; font-size: 28px;">"Presale unavailable"</h1>
                <p style="color: var(--text-secondary);">{message}</p>
            </div>
        </div>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div style="display: flex; justify-content: center; align-items: center; min-height: calc(100vh - 60px);">
            <div class="card" style="max-width: 500px; text-align: center;">
                <h1 style="margin-bottom: 16px; font-size: 32px; font-weight: 700;">"404 - Page Not Found"</h1>
                <p style="color: var(--text-secondary); margin-bottom: 24px;">"The page you're looking for doesn't exist."</p>
                <A href="/">
                    <span class="btn" style="margin-top: 20px; display: inline-block;">
                        "Go to Presale"
                    </span>
                </A>
            </div>
        </div>
    }
}
