//! # Wallet Authentication
//!
//! Builds the message a wallet signs with `personal_sign` and verifies
//! the returned signature by recovering the signer.
//!
//! ## Message format
//!
//! [`format_auth_message`] is a pure function of `(address, chain_id)`;
//! the same inputs always produce the same text, so the signed payload
//! can be reconstructed by anyone holding those two values.
//!
//! ## Verification
//!
//! Wallets sign the Keccak-256 digest of
//! `"\x19Ethereum Signed Message:\n" + len(message) + message`
//! (EIP-191). [`verify_personal_sign`] recovers the secp256k1 public
//! key from the 65-byte `r ‖ s ‖ v` signature, derives the EIP-55
//! address from it, and compares it with the expected address
//! case-insensitively. Both `v` conventions (`0/1` and `27/28`) are
//! accepted.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Wallet authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Signing was attempted without a connected provider.
    #[error("provider not connected")]
    NotConnected,

    #[error("malformed signature hex: {0}")]
    SignatureHex(#[from] hex::FromHexError),

    #[error("signature is {0} bytes, expected 65")]
    SignatureLength(usize),

    #[error("invalid recovery id {0}")]
    RecoveryId(u8),

    #[error("signature recovery failed: {0}")]
    Recovery(#[from] k256::ecdsa::Error),
}

/// Build the authentication message binding an account to a chain.
///
/// Pure in `(address, chain_id)`; the exact text is part of the
/// verification contract and must not change between signing and
/// recovery.
pub fn format_auth_message(address: &str, chain_id: u64) -> String {
    format!(
        "dSalary Authentication\n\nAddress: {}\nChain ID: {}",
        address, chain_id
    )
}

/// Keccak-256 digest of the EIP-191 envelope around `message`.
///
/// The length in the envelope is the UTF-8 byte length.
pub fn hash_personal_message(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()));
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// EIP-55 mixed-case checksum encoding of a 20-byte account.
pub fn to_checksum_address(account: &[u8; 20]) -> String {
    let lower = hex::encode(account);
    let digest = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            digest[i / 2] >> 4
        } else {
            digest[i / 2] & 0x0f
        };
        if ch.is_ascii_alphabetic() && nibble >= 8 {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Recover the EIP-55 address that signed `message` with `personal_sign`.
///
/// `signature_hex` is the wallet's 65-byte `r ‖ s ‖ v` signature, with
/// or without a `0x` prefix.
pub fn recover_personal_signer(message: &str, signature_hex: &str) -> Result<String, AuthError> {
    let raw = hex::decode(signature_hex.trim_start_matches("0x"))?;
    if raw.len() != 65 {
        return Err(AuthError::SignatureLength(raw.len()));
    }

    let v = raw[64];
    let parity = if v >= 27 { v - 27 } else { v };
    let recovery = RecoveryId::from_byte(parity).ok_or(AuthError::RecoveryId(v))?;
    let signature = Signature::from_slice(&raw[..64])?;

    let digest = hash_personal_message(message);
    let key = VerifyingKey::recover_from_prehash(&digest, &signature, recovery)?;
    Ok(public_key_address(&key))
}

/// Check that `signature_hex` over `message` was produced by
/// `expected_address`.
///
/// Address comparison ignores case, so lowercase provider output
/// matches checksummed input and vice versa.
pub fn verify_personal_sign(
    message: &str,
    signature_hex: &str,
    expected_address: &str,
) -> Result<bool, AuthError> {
    let recovered = recover_personal_signer(message, signature_hex)?;
    Ok(recovered.eq_ignore_ascii_case(expected_address))
}

/// Address of an uncompressed public key: last 20 bytes of the
/// Keccak-256 of the key material without the SEC1 tag byte.
fn public_key_address(key: &VerifyingKey) -> String {
    let point = key.to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);
    let mut account = [0u8; 20];
    account.copy_from_slice(&digest[12..]);
    to_checksum_address(&account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;

    fn test_key() -> SigningKey {
        SigningKey::from_slice(&[0x42; 32]).expect("fixed scalar should be a valid key")
    }

    fn signer_address(key: &SigningKey) -> String {
        public_key_address(key.verifying_key())
    }

    /// Sign the EIP-191 digest the way a wallet does, appending `v`
    /// with the given offset (0 or 27).
    fn sign_personal(key: &SigningKey, message: &str, v_offset: u8) -> String {
        let digest = hash_personal_message(message);
        let (signature, recovery) = key
            .sign_prehash_recoverable(&digest)
            .expect("signing should succeed");
        let mut raw = signature.to_bytes().to_vec();
        raw.push(recovery.to_byte() + v_offset);
        format!("0x{}", hex::encode(raw))
    }

    #[test]
    fn test_auth_message_is_deterministic() {
        let address = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
        let first = format_auth_message(address, 1);
        let second = format_auth_message(address, 1);
        assert_eq!(first, second);
        assert_eq!(
            first,
            "dSalary Authentication\n\nAddress: 0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359\nChain ID: 1"
        );
        assert_ne!(first, format_auth_message(address, 56));
    }

    #[test]
    fn test_verify_recovers_signer() {
        let key = test_key();
        let address = signer_address(&key);
        let message = format_auth_message(&address, 1);

        for v_offset in [0, 27] {
            let signature = sign_personal(&key, &message, v_offset);
            let valid = verify_personal_sign(&message, &signature, &address)
                .expect("well-formed signature should recover");
            assert!(valid, "v offset {} should verify", v_offset);
        }
    }

    #[test]
    fn test_verify_compares_addresses_case_insensitively() {
        let key = test_key();
        let address = signer_address(&key);
        let message = format_auth_message(&address, 1);
        let signature = sign_personal(&key, &message, 27);

        let valid = verify_personal_sign(&message, &signature, &address.to_lowercase())
            .expect("well-formed signature should recover");
        assert!(valid);
    }

    #[test]
    fn test_verify_rejects_tampered_message() {
        let key = test_key();
        let address = signer_address(&key);
        let message = format_auth_message(&address, 1);
        let signature = sign_personal(&key, &message, 27);

        let tampered = format_auth_message(&address, 56);
        let valid = verify_personal_sign(&tampered, &signature, &address)
            .expect("recovery itself should still succeed");
        assert!(!valid);
    }

    #[test]
    fn test_verify_rejects_foreign_address() {
        let key = test_key();
        let message = format_auth_message(&signer_address(&key), 1);
        let signature = sign_personal(&key, &message, 27);

        let other = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        let valid = verify_personal_sign(&message, &signature, other)
            .expect("recovery itself should still succeed");
        assert!(!valid);
    }

    #[test]
    fn test_malformed_signatures_are_errors() {
        let err = recover_personal_signer("m", "0xzz").expect_err("bad hex should fail");
        assert!(matches!(err, AuthError::SignatureHex(_)));

        let err = recover_personal_signer("m", "0xdead").expect_err("short input should fail");
        assert!(matches!(err, AuthError::SignatureLength(2)));

        let key = test_key();
        let mut raw = hex::decode(&sign_personal(&key, "m", 0)[2..]).expect("own output");
        raw[64] = 77;
        let err = recover_personal_signer("m", &hex::encode(raw))
            .expect_err("unknown recovery id should fail");
        assert!(matches!(err, AuthError::RecoveryId(77)));
    }

    #[test]
    fn test_checksum_address_vectors() {
        // EIP-55 reference vectors.
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let raw = hex::decode(expected[2..].to_lowercase()).expect("vector hex");
            let mut account = [0u8; 20];
            account.copy_from_slice(&raw);
            assert_eq!(to_checksum_address(&account), expected);
        }
    }
}
