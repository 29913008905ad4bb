//! # Token Units
//!
//! Conversions between decimal strings typed by users and 18-decimal token
//! integers, plus the local SPRAI estimate.
//!
//! ```rust
//! use alloy::primitives::U256;
//! use lib_web3::units::{format_token_amount, parse_token_amount};
//!
//! let raw = parse_token_amount("100.5").unwrap();
//! assert_eq!(raw, U256::from(100_500_000_000_000_000_000u128));
//! assert_eq!(format_token_amount(raw).unwrap(), "100.5");
//! ```

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;
use lib_core::error::{AppError, Result};
use lib_utils::validation::validate_decimal;

pub use lib_core::config::TOKEN_DECIMALS;

/// Parse a user-entered decimal amount (`"100"`, `"0.25"`) into base units.
pub fn parse_token_amount(amount: &str) -> Result<U256> {
    validate_decimal(amount, TOKEN_DECIMALS as usize, "Amount").map_err(AppError::InvalidInput)?;

    let mut normalized = amount.trim().to_string();
    if normalized.starts_with('.') {
        normalized.insert(0, '0');
    }
    if normalized.ends_with('.') {
        normalized.push('0');
    }

    parse_units(&normalized, TOKEN_DECIMALS)
        .map(|parsed| parsed.get_absolute())
        .map_err(|e| AppError::InvalidInput(format!("Amount is out of range: {}", e)))
}

/// Format base units as a decimal string without trailing zeros, keeping at
/// least one fractional digit (`"0.0"`, `"1.5"`, `"250.0"`).
pub fn format_token_amount(raw: U256) -> Result<String> {
    let formatted = format_units(raw, TOKEN_DECIMALS)
        .map_err(|e| AppError::Decoding(format!("Cannot format token amount: {}", e)))?;

    Ok(match formatted.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{}.0", whole)
            } else {
                format!("{}.{}", whole, frac)
            }
        }
        None => format!("{}.0", formatted),
    })
}

/// Local SPRAI estimate for `usdt_amount` at `price` (base units per SPRAI),
/// rounded half-up to exactly two decimals.
///
/// This does not ask the contract; its own `calculateSpraiAmount` is
/// authoritative and may round differently. Input that is not a decimal
/// estimates to `"0.00"`.
pub fn estimate_sprai_amount(usdt_amount: &str, price: U256) -> String {
    let Some(usdt) = estimate_units(usdt_amount) else {
        return "0.00".to_string();
    };
    if price.is_zero() {
        return "0.00".to_string();
    }

    // round(usdt * 100 / price) == floor((200 * usdt + price) / (2 * price))
    let hundred = U256::from(100u64);
    let numerator = usdt.saturating_mul(U256::from(200u64)).saturating_add(price);
    let cents = numerator / price.saturating_mul(U256::from(2u64));

    let whole = cents / hundred;
    let frac = (cents % hundred).to::<u64>();
    format!("{}.{:02}", whole, frac)
}

/// Base units for the estimate. Digits past [`TOKEN_DECIMALS`] are dropped
/// and amounts beyond `U256` saturate, so a larger input never estimates
/// lower than a smaller one.
fn estimate_units(usdt_amount: &str) -> Option<U256> {
    validate_decimal(usdt_amount, usize::MAX, "Amount").ok()?;

    let amount = usdt_amount.trim();
    let truncated = match amount.split_once('.') {
        Some((whole, frac)) if frac.len() > TOKEN_DECIMALS as usize => {
            format!("{}.{}", whole, &frac[..TOKEN_DECIMALS as usize])
        }
        _ => amount.to_string(),
    };

    Some(parse_token_amount(&truncated).unwrap_or(U256::MAX))
}
