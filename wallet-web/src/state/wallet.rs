//! Wallet session state management
//!
//! The session lives in a Leptos context owned by the component tree,
//! not in module-level globals. The provider's disconnect subscription
//! is a managed [`DisconnectHook`]: the registered closure is kept
//! here and removed from the provider before it is dropped.

use leptos::prelude::*;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;

use shared::auth::{format_auth_message, AuthError};
use shared::session::{WalletBackend, WalletSession};

use crate::services::wallet::{
    addDisconnectListener, clear_backend_provider, removeDisconnectListener,
};

/// Everything a sign request needs from the session, captured before
/// any await point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningRequest {
    pub backend: WalletBackend,
    pub address: String,
    pub message: String,
}

/// Managed subscription to a provider's disconnect event.
pub struct DisconnectHook {
    backend: WalletBackend,
    closure: Closure<dyn FnMut()>,
}

impl DisconnectHook {
    /// Register a disconnect callback that resets the session.
    ///
    /// Returns `None` when the provider has no event emitter. The reset
    /// runs in a fresh task so the closure is never dropped while it is
    /// executing.
    pub fn install(backend: WalletBackend, ctx: WalletContext) -> Option<Self> {
        let closure = Closure::wrap(Box::new(move || {
            log::warn!("provider reported disconnect");
            leptos::task::spawn_local(async move {
                ctx.reset();
            });
        }) as Box<dyn FnMut()>);

        if addDisconnectListener(backend.id(), closure.as_ref().unchecked_ref()) {
            Some(Self { backend, closure })
        } else {
            None
        }
    }

    /// Deregister from the provider, then drop the closure.
    fn release(self) {
        removeDisconnectListener(self.backend.id(), self.closure.as_ref().unchecked_ref());
    }
}

/// Global wallet context
#[derive(Clone, Copy)]
pub struct WalletContext {
    pub session: RwSignal<WalletSession>,
    hook: StoredValue<Option<DisconnectHook>, LocalStorage>,
}

impl WalletContext {
    pub fn new() -> Self {
        Self {
            session: RwSignal::new(WalletSession::default()),
            hook: StoredValue::new_local(None),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.with(|session| session.is_connected())
    }

    pub fn is_connecting(&self) -> bool {
        self.session.with(|session| session.is_connecting())
    }

    pub fn display_address(&self) -> String {
        self.session
            .with(|session| session.display_address().to_string())
    }

    pub fn chain_id(&self) -> u64 {
        self.session.with(|session| session.chain_id())
    }

    pub fn verified(&self) -> bool {
        self.session.with(|session| session.verified())
    }

    pub fn failure(&self) -> Option<String> {
        self.session
            .with(|session| session.failure().map(|m| m.to_string()))
    }

    pub fn set_connecting(&self) {
        self.session.set(WalletSession::Connecting);
    }

    pub fn set_connected(&self, backend: WalletBackend, address: String, chain_id: u64) {
        self.session
            .set(WalletSession::connected(backend, address, chain_id));
    }

    /// Record a rejected wallet interaction. Any provider held by a
    /// previous session is dropped, so the placeholder invariant holds.
    pub fn set_failed(&self, message: String) {
        if let Some(backend) = self.session.with_untracked(|session| session.backend()) {
            clear_backend_provider(backend);
        }
        self.release_hook();
        self.session.set(WalletSession::Failed { message });
    }

    pub fn mark_verified(&self, verified: bool) {
        self.session.update(|session| session.mark_verified(verified));
    }

    /// Build the signing request, enforcing the connected precondition.
    pub fn signing_request(&self) -> Result<SigningRequest, AuthError> {
        self.session.with_untracked(|session| {
            let signer = session.require_connected()?;
            let message = format_auth_message(signer.address, signer.chain_id);
            let backend = session.backend().ok_or(AuthError::NotConnected)?;
            Ok(SigningRequest {
                backend,
                address: signer.address.to_string(),
                message,
            })
        })
    }

    /// Keep the disconnect subscription for the connected provider,
    /// releasing any previous one.
    pub fn store_disconnect_hook(&self, hook: DisconnectHook) {
        self.release_hook();
        self.hook.set_value(Some(hook));
    }

    /// Deregister and drop the disconnect subscription, if held.
    pub fn release_hook(&self) {
        let mut taken = None;
        self.hook.update_value(|slot| taken = slot.take());
        if let Some(hook) = taken {
            hook.release();
        }
    }

    /// Clear the session: drop the held provider and its cached flag,
    /// release the disconnect subscription, restore the placeholder.
    pub fn reset(&self) {
        log::info!("resetting wallet session");
        if let Some(backend) = self.session.with_untracked(|session| session.backend()) {
            clear_backend_provider(backend);
        }
        self.release_hook();
        self.session.set(WalletSession::Disconnected);
    }
}

impl Default for WalletContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn provide_wallet_context() -> WalletContext {
    let context = WalletContext::new();
    provide_context(context);
    context
}

pub fn use_wallet_context() -> WalletContext {
    expect_context::<WalletContext>()
}
