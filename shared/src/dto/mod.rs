//! # Data Transfer Objects (DTOs)
//!
//! - [`presale`] - presale configuration snapshot and transaction handles
//!
//! ## Serialization Format
//!
//! - **Field naming**: camelCase (`#[serde(rename_all = "camelCase")]`)
//! - **Amounts**: decimal strings in whole-token units, never raw wei
//!
//! ```text
//! {
//!   "tokenPriceUsdt": "0.01",
//!   "minPurchaseUsdt": "10.0",
//!   "maxPurchaseUsdt": "10000.0",
//!   "presaleActive": true
//! }
//! ```

pub mod presale;

pub use presale::*;
