//! # Shared Utility Functions
//!
//! ## Address Formatting
//!
//! EVM account addresses are 42 characters (`0x` + 40 hex digits), far too
//! wide for a navbar button:
//! - [`format_address`] - keep the first N and last M characters
//! - [`truncate_address`] - `0x` prefix plus 4 hex digits on each side
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "0x8ba1f109551bD432803012645Ac136ddd64DBA72";
//! assert_eq!(format_address(address, 6, 4), "0x8ba1...BA72");
//! ```

/// Format a wallet address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0x8ba1f109551bD432803012645Ac136ddd64DBA72";
/// assert_eq!(format_address(addr, 6, 4), "0x8ba1...BA72");
/// assert_eq!(format_address("0x1234", 6, 4), "0x1234");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    if address_len <= prefix_len + suffix_len || !address.is_ascii() {
        return address.to_string();
    }

    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Format a wallet address as `0x` plus four hex digits on each side.
///
/// # Examples
///
/// ```rust
/// use shared::utils::truncate_address;
///
/// let addr = "0x8ba1f109551bD432803012645Ac136ddd64DBA72";
/// assert_eq!(truncate_address(addr), "0x8ba1...BA72");
/// ```
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}
