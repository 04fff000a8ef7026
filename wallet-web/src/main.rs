//! dSalary Wallet Web App - Leptos Frontend
//!
//! Employee-facing wallet page: connect an EVM wallet, display the
//! account, sign the authentication message.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

pub mod app;
pub mod components;
pub mod pages;
pub mod services;
pub mod state;
pub mod utils;

use app::App;

#[wasm_bindgen(start)]
pub fn main() {
    // Panic messages and logs go to the browser console
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("dSalary wallet page starting");

    hide_loading_screen();
    leptos::mount::mount_to_body(|| view! { <App/> });
}

/// Hide the static boot element once the WASM bundle is running.
fn hide_loading_screen() {
    let document = match web_sys::window().and_then(|w| w.document()) {
        Some(d) => d,
        None => return,
    };
    match document.get_element_by_id("leptos-loading") {
        Some(loading) => {
            if loading.set_attribute("style", "display: none;").is_err() {
                log::warn!("failed to hide the loading screen");
            }
        }
        None => log::warn!("loading element not found"),
    }
}
