//! Solidity ABI bindings for the token and exchange contracts.

// The sol! macro generates items that cannot carry docs.
#![allow(missing_docs)]

use alloy_sol_types::sol;

sol! {
    /// The `Balloons` ERC-20 token. The whole supply is minted to the
    /// deployer in the constructor.
    #[derive(Debug, PartialEq, Eq)]
    interface IBalloons {
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }

    /// The constant-product exchange pairing ETH with `Balloons`.
    /// Deployed with the token address as its only constructor argument.
    #[derive(Debug, PartialEq, Eq)]
    interface IDex {
        event EthToTokenSwap(address swapper, string txDetails, uint256 ethInput, uint256 tokenOutput);
        event TokenToEthSwap(address swapper, string txDetails, uint256 tokensInput, uint256 ethOutput);
        event LiquidityProvided(address liquidityProvider, uint256 liquidityMinted, uint256 ethInput, uint256 tokensInput);
        event LiquidityRemoved(address liquidityRemover, uint256 liquidityWithdrawn, uint256 ethOutput, uint256 tokensOutput);

        function init(uint256 tokens) external payable returns (uint256);
    }
}
