//! Contract ABIs used by the swap engine
//!
//! The router's swap entry points use non-standard selectors and are encoded
//! by hand in `application::tx_builder`; only the read-side and the standard
//! token calls are declared here.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}

sol! {
    #[sol(rpc)]
    interface IRouter {
        function getAmountsOut(uint256 amountIn, address[] path) external view returns (uint256[] amounts);
    }
}

sol! {
    interface IWrappedNative {
        function deposit() external payable;
        function withdraw(uint256 amount) external;
    }
}
