//! # Shared Data Transfer Objects Library
//!
//! Types and helpers shared by the presale libraries and the browser app.
//!
//! ## Structure
//!
//! - **[`dto`]**: serializable snapshots handed from the contract layer to the UI
//!   - **[`dto::presale`]**: presale configuration and submitted transaction handles
//! - **[`utils`]**: display helpers
//!   - **[`utils::format_address`]**: shorten an account address for display
//!   - **[`utils::truncate_address`]**: shorten with the default `0x1234...abcd` shape
//!
//! ## Wire Format
//!
//! DTOs serialize with `serde` using camelCase field names so they can be
//! handed to JavaScript through `serde-wasm-bindgen` unchanged.
//!
//! ```rust
//! use shared::dto::presale::PresaleConfig;
//! use shared::utils::truncate_address;
//!
//! let config = PresaleConfig {
//!     token_price_usdt: "0.01".to_string(),
//!     min_purchase_usdt: "10.0".to_string(),
//!     max_purchase_usdt: "10000.0".to_string(),
//!     presale_active: true,
//! };
//! assert!(config.presale_active);
//!
//! let display = truncate_address("0x8ba1f109551bD432803012645Ac136ddd64DBA72");
//! assert_eq!(display, "0x8ba1...BA72");
//! ```

pub mod dto;
pub mod utils;

pub use dto::*;
pub use utils::*;
