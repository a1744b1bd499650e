//! Contract bindings, compiled artifacts and call encoding.

pub mod artifacts;
pub mod bindings;

pub use artifacts::{ArtifactError, ContractArtifacts, load_bytecode};
pub use bindings::{IBalloons, IDex};

use crate::chain::{ChainBackend, ChainError};
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{SolCall, SolValue};
use mvdex_sdk::objects::{EtherAmount, TransactionRequest};

/// Artifact / registry name of the token contract.
pub const TOKEN_CONTRACT: &str = "Balloons";
/// Artifact / registry name of the exchange contract.
pub const EXCHANGE_CONTRACT: &str = "DEX";

/// Creation code for the exchange: its bytecode followed by the ABI
/// encoding of the token address.
pub fn exchange_init_code(bytecode: &Bytes, token: Address) -> Bytes {
    let mut code = bytecode.to_vec();
    code.extend_from_slice(&token.abi_encode());
    code.into()
}

/// Calldata for `Balloons.transfer(to, amount)`.
pub fn transfer_calldata(to: Address, amount: EtherAmount) -> Vec<u8> {
    IBalloons::transferCall {
        to,
        amount: amount.wei(),
    }
    .abi_encode()
}

/// Calldata for `Balloons.approve(spender, amount)`.
pub fn approve_calldata(spender: Address, amount: EtherAmount) -> Vec<u8> {
    IBalloons::approveCall {
        spender,
        amount: amount.wei(),
    }
    .abi_encode()
}

/// Calldata for `DEX.init(tokens)`.
pub fn init_calldata(tokens: EtherAmount) -> Vec<u8> {
    IDex::initCall {
        tokens: tokens.wei(),
    }
    .abi_encode()
}

/// Read `Balloons.balanceOf(account)`.
pub async fn token_balance<B: ChainBackend + ?Sized>(
    backend: &B,
    token: Address,
    account: Address,
) -> Result<EtherAmount, ChainError> {
    let data = IBalloons::balanceOfCall { account }.abi_encode();
    let output = backend
        .call(TransactionRequest::call(account, token, data))
        .await?;
    let balance = IBalloons::balanceOfCall::abi_decode_returns(&output, true)?;
    Ok(EtherAmount::from_wei(balance._0))
}
