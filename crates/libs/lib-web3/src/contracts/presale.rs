//! Presale contract binding.
//!
//! `buyTokens` pulls `usdtAmount` from the caller (so it needs a prior
//! `approve`), forwards it to the owner and sends SPRAI back in the same
//! transaction.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IPresale {
        function buyTokens(uint256 usdtAmount) external;
        function calculateSpraiAmount(uint256 usdtAmount) external view returns (uint256);
        function getConfig() external view returns (uint256 price, uint256 minPurchase, uint256 maxPurchase, bool active);
    }
}
