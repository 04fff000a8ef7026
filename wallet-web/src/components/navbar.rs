//! Navigation Bar Component

use leptos::prelude::*;
use leptos_router::components::A;

use crate::utils::constants::PAGE_TITLE;

#[component]
pub fn Navbar() -> impl IntoView {
    view! {
        <nav>
            <div style="max-width: 1200px; margin: 0 auto; padding: 0 24px; display: flex; justify-content: flex-start; align-items: center;">
                <A href="/">
                    <span class="nav-title">{PAGE_TITLE}</span>
                </A>
            </div>
        </nav>
    }
}
