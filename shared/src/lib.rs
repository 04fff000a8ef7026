//! # Shared Wallet Domain Library
//!
//! Wasm-free logic shared by the wallet frontend and native tests:
//! session state, authentication message construction, and EIP-191
//! signature verification.
//!
//! ## Structure
//!
//! - **[`session`]**: Wallet session state machine and backend identifiers
//!   - **[`session::WalletSession`]**: `Disconnected` / `Connecting` / `Connected` / `Failed`
//!   - **[`session::ConnectionState`]**: displayed chain id, address, and verified flag
//! - **[`auth`]**: Authentication message and signature verification
//!   - **[`auth::format_auth_message`]**: deterministic message text for `personal_sign`
//!   - **[`auth::verify_personal_sign`]**: recover the EIP-191 signer and compare addresses
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_address`]**: Format wallet addresses for display
//!   - **[`utils::truncate_address`]**: Truncate addresses with ellipsis
//!
//! ## Usage in the frontend
//!
//! ```rust
//! use shared::auth::{format_auth_message, verify_personal_sign};
//! use shared::session::WalletSession;
//!
//! let session = WalletSession::default();
//! assert!(session.require_connected().is_err());
//!
//! let message = format_auth_message("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359", 1);
//! assert!(message.contains("Chain ID: 1"));
//! ```

pub mod auth;
pub mod session;
pub mod utils;

pub use session::{ConnectionState, SignerView, WalletBackend, WalletSession};
pub use utils::{format_address, truncate_address};
