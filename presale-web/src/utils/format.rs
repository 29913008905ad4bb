//! # Formatting Utilities for the Presale Page
//!
//! Display formatting for decimal token strings. Amounts arrive as exact
//! decimal strings from the contract service and are never converted to
//! floating point.
//!
//! For address formatting, use [`shared::utils::truncate_address`].

/// Group the integer part with commas and cut the fraction to at most
/// `max_decimals` digits (truncating, never rounding up).
///
/// # Examples
///
/// ```rust
/// use presale_web::utils::format::format_token_display;
///
/// assert_eq!(format_token_display("1234567.891", 2), "1,234,567.89");
/// assert_eq!(format_token_display("100.0", 2), "100");
/// ```
pub fn format_token_display(value: &str, max_decimals: usize) -> String {
    let value = value.trim();
    let (integer_part, decimal_part) = value.split_once('.').unwrap_or((value, ""));

    if integer_part.is_empty() && decimal_part.is_empty()
        || !integer_part.chars().all(|c| c.is_ascii_digit())
    {
        return value.to_string();
    }

    let integer_part = if integer_part.is_empty() { "0" } else { integer_part };

    // Add commas to integer part
    let mut grouped = String::with_capacity(integer_part.len() + integer_part.len() / 3);
    for (i, ch) in integer_part.chars().enumerate() {
        if i > 0 && (integer_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let decimals: String = decimal_part.chars().take(max_decimals).collect();
    let decimals = decimals.trim_end_matches('0');

    if decimals.is_empty() {
        grouped
    } else {
        format!("{}.{}", grouped, decimals)
    }
}

/// Purchase limits line. A zero maximum means there is no cap, matching
/// [`lib_web3::check_purchase_amount`].
pub fn format_purchase_limits(min_usdt: &str, max_usdt: &str) -> String {
    let min = format_token_display(min_usdt, 2);
    let uncapped = lib_web3::parse_token_amount(max_usdt).is_ok_and(|max| max.is_zero());
    if uncapped {
        format!("{} USDT minimum, no maximum", min)
    } else {
        format!("{} - {} USDT", min, format_token_display(max_usdt, 2))
    }
}
