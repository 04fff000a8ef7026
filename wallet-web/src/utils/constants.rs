//! Application constants and wallet backend configuration

use serde::{Deserialize, Serialize};

use shared::session::{WalletBackend, DEFAULT_CHAIN_ID};

pub const APP_NAME: &str = "dSalary";
pub const PAGE_TITLE: &str = "dSalary Dashboard | Employee Perspective";

/// JSON-RPC endpoint handed to backend SDKs that construct their own
/// provider (injected providers bring their own transport).
pub const MAINNET_RPC_URL: &str = "https://cloudflare-eth.com";

/// Pass-through options for one wallet backend, serialized as-is to
/// the interop layer. Field names are the contract with the inline JS.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackendOptions {
    pub app_name: String,
    pub rpc_url: String,
    pub chain_id: u64,
    pub dark_mode: bool,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            rpc_url: MAINNET_RPC_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            dark_mode: true,
        }
    }
}

/// One chooser entry: a backend plus its pass-through options.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendEntry {
    pub backend: WalletBackend,
    pub options: BackendOptions,
}

/// Chooser entry for a backend.
pub fn backend_entry(backend: WalletBackend) -> BackendEntry {
    BackendEntry {
        backend,
        options: BackendOptions::default(),
    }
}

/// Static chooser configuration, in display order.
pub fn backend_entries() -> Vec<BackendEntry> {
    WalletBackend::ALL.into_iter().map(backend_entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_serialize_with_interop_field_names() {
        let json = serde_json::to_value(BackendOptions::default())
            .expect("options should serialize");
        assert_eq!(json["app_name"], "dSalary");
        assert_eq!(json["chain_id"], 1);
        assert_eq!(json["dark_mode"], true);
        assert!(json["rpc_url"].as_str().expect("rpc url").starts_with("https://"));
    }

    #[test]
    fn test_chooser_lists_every_backend_once() {
        let entries = backend_entries();
        assert_eq!(entries.len(), WalletBackend::ALL.len());
        for (entry, backend) in entries.iter().zip(WalletBackend::ALL) {
            assert_eq!(entry.backend, backend);
        }
    }
}
