//! # Shared Utility Functions
//!
//! Address display helpers used by the wallet frontend and its logs.
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
//! assert_eq!(format_address(address, 4, 4), "0xfB69...d359");
//! ```

/// Format a wallet address by showing the first `prefix_len` hex digits
/// after the `0x` prefix and the last `suffix_len` characters.
///
/// If the address is too short to truncate meaningfully, it is returned
/// as-is. Byte indexing is safe here: EVM addresses are ASCII hex.
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let (scheme, body) = match address.strip_prefix("0x") {
        Some(rest) => ("0x", rest),
        None => ("", address),
    };

    let body_len = body.len();
    if body_len <= prefix_len + suffix_len || prefix_len >= body_len || suffix_len >= body_len {
        return address.to_string();
    }

    format!(
        "{}{}...{}",
        scheme,
        &body[..prefix_len],
        &body[body_len - suffix_len..]
    )
}

/// Format a wallet address with default 4-character prefix and suffix.
pub fn truncate_address(address: &str) -> String {
    format_address(address, 4, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address() {
        let addr = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
        assert_eq!(format_address(addr, 4, 4), "0xfB69...d359");
        assert_eq!(format_address(addr, 6, 6), "0xfB6916...c5d359");
    }

    #[test]
    fn test_format_address_short() {
        assert_eq!(format_address("0xABC", 4, 4), "0xABC");
        assert_eq!(format_address("abc", 4, 4), "abc");
    }

    #[test]
    fn test_truncate_address() {
        let addr = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
        assert_eq!(truncate_address(addr), "0xfB69...d359");
    }
}
