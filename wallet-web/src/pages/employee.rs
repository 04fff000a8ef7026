//! Employee Dashboard Page - wallet connection and message signing
//!
//! Two-state view: a single connect button while no wallet is held,
//! and address / sign-message / disconnect buttons once connected.
//! The connect button toggles the backend chooser built from the
//! static configuration table.

use leptos::logging::log;
use leptos::prelude::*;

use shared::auth::verify_personal_sign;
use shared::session::WalletBackend;
use shared::utils::truncate_address;

use crate::services::wallet::{
    cached_backend, connect_backend, get_available_backends, sign_message_backend,
};
use crate::state::wallet::{use_wallet_context, DisconnectHook};
use crate::utils::constants::{backend_entries, backend_entry};

#[component]
pub fn EmployeePage() -> impl IntoView {
    let wallet_ctx = use_wallet_context();

    let (chooser_open, set_chooser_open) = signal(false);
    let (sign_error, set_sign_error) = signal(None::<String>);

    // Log which backends this browser actually has; the chooser lists
    // the full configured set regardless.
    leptos::task::spawn_local(async move {
        let available = get_available_backends();
        if available.is_empty() {
            log!("no wallet backends detected");
        }
        for backend in available {
            log!("detected wallet backend: {}", backend.name());
        }
        if let Some(backend) = cached_backend() {
            log!("last session connected via {}", backend.name());
        }
    });

    // The disconnect subscription must not outlive the page.
    on_cleanup(move || wallet_ctx.release_hook());

    let connect = move |backend: WalletBackend| {
        if wallet_ctx.is_connecting() {
            return;
        }
        set_chooser_open.set(false);
        set_sign_error.set(None);
        wallet_ctx.set_connecting();

        leptos::task::spawn_local(async move {
            let entry = backend_entry(backend);
            match connect_backend(backend, &entry.options).await {
                Ok((address, chain_id)) => {
                    log!(
                        "{} connected as {} on chain {}",
                        backend.name(),
                        truncate_address(&address),
                        chain_id
                    );
                    wallet_ctx.set_connected(backend, address, chain_id);
                    match DisconnectHook::install(backend, wallet_ctx) {
                        Some(hook) => wallet_ctx.store_disconnect_hook(hook),
                        None => log::warn!(
                            "{} provider does not emit disconnect events",
                            backend.name()
                        ),
                    }
                }
                Err(e) => {
                    log::error!("wallet connect failed: {}", e);
                    wallet_ctx.set_failed(e);
                }
            }
        });
    };

    let sign_message = move |_| {
        let request = match wallet_ctx.signing_request() {
            Ok(request) => request,
            Err(e) => {
                log::error!("{}", e);
                set_sign_error.set(Some(e.to_string()));
                return;
            }
        };

        leptos::task::spawn_local(async move {
            match sign_message_backend(request.backend, &request.message, &request.address).await {
                Ok(signature) => {
                    log!("Signature {}", signature);
                    match verify_personal_sign(&request.message, &signature, &request.address) {
                        Ok(valid) => {
                            log!("isValid {}", valid);
                            wallet_ctx.mark_verified(valid);
                            if !valid {
                                set_sign_error.set(Some(
                                    "signature did not match the connected address".to_string(),
                                ));
                            }
                        }
                        Err(e) => {
                            log::error!("signature verification failed: {}", e);
                            wallet_ctx.mark_verified(false);
                            set_sign_error.set(Some(format!("verification failed: {}", e)));
                        }
                    }
                }
                Err(e) => {
                    // The provider is still held; only this request failed.
                    log::error!("wallet sign failed: {}", e);
                    set_sign_error.set(Some(e));
                }
            }
        });
    };

    let disconnect = move |_| {
        set_chooser_open.set(false);
        set_sign_error.set(None);
        wallet_ctx.reset();
    };

    let toggle_chooser = move |_| {
        if !wallet_ctx.is_connecting() {
            set_chooser_open.update(|open| *open = !*open);
        }
    };

    view! {
        <div class="container">
            <div class="card">
                {move || {
                    if wallet_ctx.is_connected() {
                        view! {
                            <div>
                                <button class="btn address" on:click=toggle_chooser>
                                    {wallet_ctx.display_address()}
                                </button>
                                <button class="btn" on:click=sign_message>"Sign Message"</button>
                                <button class="btn" on:click=disconnect>"Disconnect Wallet"</button>
                                <p class="chain-line">{format!("Chain ID: {}", wallet_ctx.chain_id())}</p>
                                {move || wallet_ctx.verified().then(|| view! {
                                    <p class="success">"Signature verified"</p>
                                })}
                            </div>
                        }
                            .into_any()
                    } else {
                        let connecting = wallet_ctx.is_connecting();
                        let label = if connecting {
                            "Connecting...".to_string()
                        } else {
                            wallet_ctx.display_address()
                        };
                        view! {
                            <button class="btn" on:click=toggle_chooser disabled=connecting>
                                {label}
                            </button>
                        }
                            .into_any()
                    }
                }}

                {move || chooser_open.get().then(|| view! {
                    <div class="chooser">
                        <p class="subtitle">"Select a wallet"</p>
                        {backend_entries().into_iter().map(|entry| {
                            let backend = entry.backend;
                            view! {
                                <button class="wallet-button" on:click=move |_| connect(backend)>
                                    {backend.name()}
                                </button>
                            }
                        }).collect::<Vec<_>>()}
                    </div>
                })}

                {move || {
                    wallet_ctx.failure().or_else(|| sign_error.get()).map(|message| view! {
                        <div class="error">
                            <p>{message}</p>
                        </div>
                    })
                }}
            </div>
        </div>
    }
}
