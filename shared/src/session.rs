//! # Wallet Session State
//!
//! The session is an explicit value owned by the UI layer and swapped
//! atomically on every transition, so the displayed address is the
//! placeholder exactly when no provider is held.
//!
//! ## States
//!
//! - [`WalletSession::Disconnected`]: no provider held, placeholder shown
//! - [`WalletSession::Connecting`]: a connect request is in flight; further
//!   connect/sign requests are rejected until it settles
//! - [`WalletSession::Connected`]: a provider is held for one backend
//! - [`WalletSession::Failed`]: the last wallet interaction was rejected;
//!   no provider is held

use serde::{Deserialize, Serialize};

use crate::auth::AuthError;

/// Label shown in place of an address while no wallet is connected.
pub const ADDRESS_PLACEHOLDER: &str = "Connect Wallet";

/// Chain id assumed before a provider reports one (Ethereum mainnet).
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Supported wallet backends, in chooser order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletBackend {
    CoinbaseWallet,
    WalletConnect,
    BinanceChain,
}

impl WalletBackend {
    pub const ALL: [WalletBackend; 3] = [
        WalletBackend::CoinbaseWallet,
        WalletBackend::WalletConnect,
        WalletBackend::BinanceChain,
    ];

    /// Display name shown on the chooser button.
    pub fn name(&self) -> &'static str {
        match self {
            WalletBackend::CoinbaseWallet => "Coinbase Wallet",
            WalletBackend::WalletConnect => "WalletConnect",
            WalletBackend::BinanceChain => "Binance Chain Wallet",
        }
    }

    /// Stable identifier used at the interop boundary and in the
    /// cached-backend flag.
    pub fn id(&self) -> &'static str {
        match self {
            WalletBackend::CoinbaseWallet => "coinbasewallet",
            WalletBackend::WalletConnect => "walletconnect",
            WalletBackend::BinanceChain => "binancechain",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.id() == id)
    }
}

/// Displayed connection state: network, account, and whether the last
/// signed message verified against the account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionState {
    pub chain_id: u64,
    pub address: String,
    pub verified: bool,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            address: ADDRESS_PLACEHOLDER.to_string(),
            verified: false,
        }
    }
}

/// Borrowed view over a connected session scoped to one account.
///
/// Used to build the authentication message without cloning the
/// session; it exposes only what signing needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignerView<'a> {
    pub address: &'a str,
    pub chain_id: u64,
}

/// Wallet session state machine.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum WalletSession {
    #[default]
    Disconnected,
    Connecting,
    Connected {
        backend: WalletBackend,
        state: ConnectionState,
    },
    Failed {
        message: String,
    },
}

impl WalletSession {
    /// Session for a freshly connected account.
    pub fn connected(backend: WalletBackend, address: String, chain_id: u64) -> Self {
        WalletSession::Connected {
            backend,
            state: ConnectionState {
                chain_id,
                address,
                verified: false,
            },
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, WalletSession::Connected { .. })
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, WalletSession::Connecting)
    }

    pub fn backend(&self) -> Option<WalletBackend> {
        match self {
            WalletSession::Connected { backend, .. } => Some(*backend),
            _ => None,
        }
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            WalletSession::Connected { state, .. } => Some(state.address.as_str()),
            _ => None,
        }
    }

    /// Address string for the connect/address button: the account when
    /// connected, the placeholder otherwise.
    pub fn display_address(&self) -> &str {
        self.address().unwrap_or(ADDRESS_PLACEHOLDER)
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            WalletSession::Connected { state, .. } => state.chain_id,
            _ => DEFAULT_CHAIN_ID,
        }
    }

    pub fn verified(&self) -> bool {
        match self {
            WalletSession::Connected { state, .. } => state.verified,
            _ => false,
        }
    }

    /// Failure message of a rejected wallet interaction, if any.
    pub fn failure(&self) -> Option<&str> {
        match self {
            WalletSession::Failed { message } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Record the verification verdict of the last signed message.
    ///
    /// No-op unless connected.
    pub fn mark_verified(&mut self, verified: bool) {
        if let WalletSession::Connected { state, .. } = self {
            state.verified = verified;
        }
    }

    /// Signing precondition: a provider must be held.
    pub fn require_connected(&self) -> Result<SignerView<'_>, AuthError> {
        match self {
            WalletSession::Connected { state, .. } => Ok(SignerView {
                address: &state.address,
                chain_id: state.chain_id,
            }),
            _ => Err(AuthError::NotConnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_requires_connection() {
        for session in [
            WalletSession::Disconnected,
            WalletSession::Connecting,
            WalletSession::Failed {
                message: "user rejected".to_string(),
            },
        ] {
            let err = session
                .require_connected()
                .expect_err("signing should be rejected without a provider");
            assert!(matches!(err, AuthError::NotConnected));
        }
    }

    #[test]
    fn test_connected_session_displays_account() {
        let session =
            WalletSession::connected(WalletBackend::CoinbaseWallet, "0xABC".to_string(), 1);
        assert!(session.is_connected());
        assert_eq!(session.display_address(), "0xABC");
        assert_eq!(session.chain_id(), 1);
        assert!(!session.verified());

        let signer = session
            .require_connected()
            .expect("connected session should yield a signer view");
        assert_eq!(signer.address, "0xABC");
        assert_eq!(signer.chain_id, 1);
    }

    #[test]
    fn test_reset_restores_placeholder() {
        let mut session =
            WalletSession::connected(WalletBackend::WalletConnect, "0xABC".to_string(), 56);
        session = WalletSession::Disconnected;
        assert_eq!(session.display_address(), ADDRESS_PLACEHOLDER);
        assert_eq!(session.chain_id(), DEFAULT_CHAIN_ID);
        assert!(session.backend().is_none());
    }

    #[test]
    fn test_mark_verified_only_touches_connected_state() {
        let mut session =
            WalletSession::connected(WalletBackend::BinanceChain, "0xABC".to_string(), 1);
        session.mark_verified(true);
        assert!(session.verified());

        let mut disconnected = WalletSession::Disconnected;
        disconnected.mark_verified(true);
        assert!(!disconnected.verified());
    }

    #[test]
    fn test_backend_ids_round_trip() {
        for backend in WalletBackend::ALL {
            assert_eq!(WalletBackend::from_id(backend.id()), Some(backend));
            let json = serde_json::to_string(&backend).expect("backend should serialize");
            assert_eq!(json, format!("\"{}\"", backend.id()));
        }
        assert_eq!(WalletBackend::from_id("metamask"), None);
    }
}
