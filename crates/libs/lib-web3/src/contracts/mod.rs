//! # Contract Bindings
//!
//! ABI bindings for the two contracts the presale talks to. The ABIs are a
//! fixed wire contract; a mismatch with the deployed bytecode shows up as a
//! revert or a decoding error at call time, nothing checks it up front.
//!
//! - [`erc20::IUsdt`] - the USDT (BEP-20) token: `balanceOf`, `approve`, `allowance`
//! - [`presale::IPresale`] - the presale: `buyTokens`, `calculateSpraiAmount`, `getConfig`

pub mod erc20;
pub mod presale;

pub use erc20::IUsdt;
pub use presale::IPresale;
