//! USDT token binding.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IUsdt {
        function balanceOf(address account) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
    }
}
