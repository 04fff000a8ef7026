//! EVM Wallet Integration via wasm-bindgen
//!
//! JavaScript interop for the supported wallet backends (Coinbase
//! Wallet, WalletConnect, Binance Chain Wallet). Providers are
//! EIP-1193 objects reached through their injected globals or
//! constructed from a backend SDK with the pass-through options; once
//! resolved they are kept in a per-backend registry until reset.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use shared::session::{WalletBackend, DEFAULT_CHAIN_ID};

use crate::utils::constants::BackendOptions;

// ============================================================================
// BACKEND DETECTION AND CONNECTION (JavaScript Interop)
// ============================================================================

#[wasm_bindgen(inline_js = "
let _providers = {};

export function detectBackends() {
    const backends = [];

    if (window.coinbaseWalletExtension ||
        (window.ethereum && window.ethereum.isCoinbaseWallet) ||
        window.CoinbaseWalletSDK) {
        backends.push({ name: 'Coinbase Wallet', backend: 'coinbasewallet', installed: true });
    }

    if (window.WalletConnectProvider ||
        (window.ethereum && window.ethereum.isWalletConnect)) {
        backends.push({ name: 'WalletConnect', backend: 'walletconnect', installed: true });
    }

    if (window.BinanceChain) {
        backends.push({ name: 'Binance Chain Wallet', backend: 'binancechain', installed: true });
    }

    return backends;
}

export function getBackendProvider(backend, options) {
    if (_providers[backend]) {
        return _providers[backend];
    }

    let provider = null;
    switch (backend) {
        case 'coinbasewallet': {
            provider = window.coinbaseWalletExtension || null;
            if (!provider && window.ethereum && window.ethereum.isCoinbaseWallet) {
                provider = window.ethereum;
            }
            // Without an injected provider, construct one from the SDK
            // using the pass-through options.
            if (!provider && window.CoinbaseWalletSDK && options) {
                const sdk = new window.CoinbaseWalletSDK({
                    appName: options.app_name,
                    darkMode: options.dark_mode,
                });
                provider = sdk.makeWeb3Provider(options.rpc_url, options.chain_id);
            }
            break;
        }
        case 'walletconnect': {
            if (window.ethereum && window.ethereum.isWalletConnect) {
                provider = window.ethereum;
            } else if (window.WalletConnectProvider && options) {
                const Ctor = window.WalletConnectProvider.default || window.WalletConnectProvider;
                const rpc = {};
                rpc[options.chain_id] = options.rpc_url;
                provider = new Ctor({ rpc: rpc });
            }
            break;
        }
        case 'binancechain':
            provider = window.BinanceChain || null;
            break;
        default:
            provider = window.ethereum || null;
    }

    if (provider) {
        _providers[backend] = provider;
    }
    return provider;
}

export async function connectBackend(backend, options) {
    const provider = getBackendProvider(backend, options);
    if (!provider) {
        throw new Error(backend + ' provider not found. Install the wallet extension and reload.');
    }

    try {
        let accounts;
        if (typeof provider.request === 'function') {
            accounts = await provider.request({ method: 'eth_requestAccounts', params: [] });
        } else if (typeof provider.enable === 'function') {
            // Legacy providers predating EIP-1193 request()
            accounts = await provider.enable();
        } else {
            throw new Error('provider exposes neither request() nor enable()');
        }
        if (!accounts || accounts.length === 0) {
            throw new Error('provider returned no accounts');
        }

        let chainId = options ? options.chain_id : 1;
        if (typeof provider.request === 'function') {
            const reported = await provider.request({ method: 'eth_chainId', params: [] });
            const parsed = parseInt(reported, 16);
            if (!Number.isNaN(parsed)) {
                chainId = parsed;
            }
        }

        window.localStorage.setItem('dsalary.cached_backend', backend);
        return { address: accounts[0], chainId: chainId };
    } catch (error) {
        const msg = error && error.message ? error.message : String(error);
        throw new Error('Failed to connect to ' + backend + ': ' + msg);
    }
}

export async function personalSign(backend, message, address) {
    const provider = _providers[backend];
    if (!provider) {
        throw new Error(backend + ' provider not found');
    }
    if (typeof provider.request !== 'function') {
        throw new Error('wallet does not support message signing');
    }

    try {
        return await provider.request({ method: 'personal_sign', params: [message, address] });
    } catch (error) {
        const msg = error && error.message ? error.message : String(error);
        throw new Error('Failed to sign message: ' + msg);
    }
}

export function addDisconnectListener(backend, callback) {
    const provider = _providers[backend];
    if (provider && typeof provider.on === 'function') {
        provider.on('disconnect', callback);
        return true;
    }
    return false;
}

export function removeDisconnectListener(backend, callback) {
    const provider = _providers[backend];
    if (provider && typeof provider.removeListener === 'function') {
        provider.removeListener('disconnect', callback);
    }
}

export function cachedBackend() {
    return window.localStorage.getItem('dsalary.cached_backend');
}

export function clearBackendProvider(backend) {
    delete _providers[backend];
    window.localStorage.removeItem('dsalary.cached_backend');
}
")]
extern "C" {
    /// Detect the installed wallet backends
    pub fn detectBackends() -> JsValue;

    /// Connect to a backend and return `{ address, chainId }`
    #[wasm_bindgen(catch)]
    pub async fn connectBackend(backend: &str, options: &JsValue) -> Result<JsValue, JsValue>;

    /// Request a personal_sign signature from the connected backend
    #[wasm_bindgen(catch)]
    pub async fn personalSign(backend: &str, message: &str, address: &str)
        -> Result<JsValue, JsValue>;

    /// Subscribe to the provider's disconnect event; false when the
    /// provider has no event emitter
    pub fn addDisconnectListener(backend: &str, callback: &js_sys::Function) -> bool;

    /// Remove a previously registered disconnect callback
    pub fn removeDisconnectListener(backend: &str, callback: &js_sys::Function);

    /// Backend id recorded by the last successful connect, if any
    pub fn cachedBackend() -> Option<String>;

    /// Drop the held provider and clear the cached-backend flag
    pub fn clearBackendProvider(backend: &str);
}

// ============================================================================
// WALLET SERVICE
// ============================================================================

/// Detected backend information as reported by the interop layer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectedBackend {
    pub name: String,
    pub backend: String,
    pub installed: bool,
}

/// Backends whose provider (or SDK) is present in this browser
pub fn get_available_backends() -> Vec<WalletBackend> {
    let detected: Vec<DetectedBackend> =
        serde_wasm_bindgen::from_value(detectBackends()).unwrap_or_default();
    detected
        .iter()
        .filter_map(|d| WalletBackend::from_id(&d.backend))
        .collect()
}

/// Backend id cached by the last successful connect, if still present
pub fn cached_backend() -> Option<WalletBackend> {
    cachedBackend().and_then(|id| WalletBackend::from_id(&id))
}

/// Connect to a wallet backend.
///
/// Returns the first account address and the chain id reported by the
/// provider (falling back to the configured default when the provider
/// does not report one).
pub async fn connect_backend(
    backend: WalletBackend,
    options: &BackendOptions,
) -> Result<(String, u64), String> {
    let options = serde_wasm_bindgen::to_value(options)
        .map_err(|e| format!("bad backend options: {}", e))?;

    match connectBackend(backend.id(), &options).await {
        Ok(result) => {
            let address = js_sys::Reflect::get(&result, &JsValue::from_str("address"))
                .ok()
                .and_then(|v| v.as_string())
                .ok_or_else(|| "connect result is missing an address".to_string())?;
            let chain_id = js_sys::Reflect::get(&result, &JsValue::from_str("chainId"))
                .ok()
                .and_then(|v| v.as_f64())
                .map(|v| v as u64)
                .unwrap_or(DEFAULT_CHAIN_ID);
            Ok((address, chain_id))
        }
        Err(e) => Err(js_error_message(e)),
    }
}

/// Request a personal_sign signature over `message` from the backend.
///
/// Returns the 65-byte signature as 0x-prefixed hex, exactly as the
/// wallet produced it.
pub async fn sign_message_backend(
    backend: WalletBackend,
    message: &str,
    address: &str,
) -> Result<String, String> {
    match personalSign(backend.id(), message, address).await {
        Ok(value) => value
            .as_string()
            .ok_or_else(|| "signature is not a string".to_string()),
        Err(e) => Err(js_error_message(e)),
    }
}

/// Drop the held provider for a backend and clear the cached flag
pub fn clear_backend_provider(backend: WalletBackend) {
    clearBackendProvider(backend.id());
}

fn js_error_message(value: JsValue) -> String {
    if let Some(text) = value.as_string() {
        text
    } else if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        String::from(error.message())
    } else {
        format!("wallet error: {:?}", value)
    }
}
