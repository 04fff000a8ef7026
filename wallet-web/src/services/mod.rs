//! Wallet interop services

pub mod wallet;
