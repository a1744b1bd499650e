//! In-memory development chain used by the unit tests.
//!
//! Mines one block per transaction and simulates just enough of the
//! `Balloons` token and the exchange to exercise the deployment sequence.

use crate::chain::{ChainBackend, ChainError};
use crate::contracts::{ContractArtifacts, IBalloons, IDex};
use alloy_primitives::{Address, B256, Bytes, U64, U256, address, keccak256};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use mvdex_sdk::client::RpcError;
use mvdex_sdk::objects::{BlockTag, EtherAmount, LogFilter, RpcLog, TransactionReceipt, TransactionRequest};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub const DEV_DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const DEV_SECOND_ACCOUNT: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

/// Supply minted to the deployer by the token constructor.
pub fn token_supply() -> EtherAmount {
    EtherAmount::ether(1000)
}

#[derive(Debug, Clone)]
enum Deployed {
    Token,
    Exchange { constructor_args: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeInit {
    pub exchange: Address,
    pub tokens: U256,
    pub value: U256,
    pub gas: Option<U64>,
}

#[derive(Default)]
struct DevState {
    head: u64,
    tx_count: u64,
    sent: Vec<TransactionRequest>,
    receipts: HashMap<B256, TransactionReceipt>,
    contracts: HashMap<Address, Deployed>,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    inits: Vec<ExchangeInit>,
    logs: Vec<RpcLog>,
    revert_selector: Option<[u8; 4]>,
}

pub struct DevChain {
    chain_id: u64,
    artifacts: Option<ContractArtifacts>,
    advance_on_poll: AtomicBool,
    fail_calls: AtomicBool,
    state: Mutex<DevState>,
}

impl DevChain {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            artifacts: None,
            advance_on_poll: AtomicBool::new(false),
            fail_calls: AtomicBool::new(false),
            state: Mutex::new(DevState::default()),
        }
    }

    /// Recognize deployments of these artifacts as the token / exchange.
    pub fn with_artifacts(mut self, artifacts: ContractArtifacts) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    /// Mine an empty block on every `eth_blockNumber`, as a live network
    /// keeps producing blocks while the caller waits.
    pub fn with_block_advance_on_poll(self) -> Self {
        self.set_block_advance_on_poll(true);
        self
    }

    pub fn set_block_advance_on_poll(&self, advance: bool) {
        self.advance_on_poll.store(advance, Ordering::SeqCst);
    }

    /// Fail every `eth_call` as an unreachable node would.
    pub fn with_failing_calls(self) -> Self {
        self.fail_calls.store(true, Ordering::SeqCst);
        self
    }

    /// Revert every transaction whose calldata starts with `selector`.
    pub fn revert_on(self, selector: [u8; 4]) -> Self {
        self.state.lock().unwrap().revert_selector = Some(selector);
        self
    }

    pub fn clear_revert(&self) {
        self.state.lock().unwrap().revert_selector = None;
    }

    pub fn deployer(&self) -> Address {
        DEV_DEPLOYER
    }

    pub fn head(&self) -> u64 {
        self.state.lock().unwrap().head
    }

    pub fn sent_transactions(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn deployment_count(&self) -> usize {
        self.sent_transactions()
            .iter()
            .filter(|tx| tx.to.is_none())
            .count()
    }

    pub fn balance_of(&self, account: Address) -> EtherAmount {
        let state = self.state.lock().unwrap();
        EtherAmount::from_wei(state.balances.get(&account).copied().unwrap_or_default())
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> EtherAmount {
        let state = self.state.lock().unwrap();
        EtherAmount::from_wei(
            state
                .allowances
                .get(&(owner, spender))
                .copied()
                .unwrap_or_default(),
        )
    }

    pub fn exchange_constructor_args(&self, exchange: Address) -> Option<Vec<u8>> {
        match self.state.lock().unwrap().contracts.get(&exchange) {
            Some(Deployed::Exchange { constructor_args }) => Some(constructor_args.clone()),
            _ => None,
        }
    }

    pub fn inits(&self) -> Vec<ExchangeInit> {
        self.state.lock().unwrap().inits.clone()
    }

    /// Append a log, mining up to its block if needed.
    pub fn push_log(&self, log: RpcLog) {
        let mut state = self.state.lock().unwrap();
        state.head = state.head.max(log.block_number.to::<u64>());
        state.logs.push(log);
    }

    fn classify(&self, init_code: &[u8]) -> Option<Deployed> {
        let artifacts = self.artifacts.as_ref()?;
        if let Some(args) = init_code.strip_prefix(artifacts.exchange.as_ref()) {
            return Some(Deployed::Exchange {
                constructor_args: args.to_vec(),
            });
        }
        if init_code.starts_with(artifacts.token.as_ref()) {
            return Some(Deployed::Token);
        }
        None
    }
}

fn revert(reason: &str) -> ChainError {
    ChainError::Reverted {
        hash: None,
        reason: reason.to_string(),
    }
}

fn move_tokens(state: &mut DevState, from: Address, to: Address, amount: U256) -> Result<(), ChainError> {
    let balance = state.balances.get(&from).copied().unwrap_or_default();
    if balance < amount {
        return Err(revert("ERC20: transfer amount exceeds balance"));
    }
    state.balances.insert(from, balance - amount);
    *state.balances.entry(to).or_default() += amount;
    Ok(())
}

fn apply_call(state: &mut DevState, tx: &TransactionRequest, to: Address, data: &[u8]) -> Result<(), ChainError> {
    match state.contracts.get(&to).cloned() {
        Some(Deployed::Token) => {
            if let Ok(call) = IBalloons::transferCall::abi_decode(data, true) {
                return move_tokens(state, tx.from, call.to, call.amount);
            }
            if let Ok(call) = IBalloons::approveCall::abi_decode(data, true) {
                state.allowances.insert((tx.from, call.spender), call.amount);
                return Ok(());
            }
            Err(revert("unknown token function"))
        }
        Some(Deployed::Exchange { constructor_args }) => {
            let call = IDex::initCall::abi_decode(data, true)
                .map_err(|_| revert("unknown exchange function"))?;
            let token = Address::abi_decode(&constructor_args, true)
                .map_err(|_| revert("bad constructor args"))?;
            if !matches!(state.contracts.get(&token), Some(Deployed::Token)) {
                return Err(revert("exchange token is not a token"));
            }
            let allowance = state
                .allowances
                .get(&(tx.from, to))
                .copied()
                .unwrap_or_default();
            if allowance < call.tokens {
                return Err(revert("ERC20: insufficient allowance"));
            }
            state.allowances.insert((tx.from, to), allowance - call.tokens);
            move_tokens(state, tx.from, to, call.tokens)?;
            state.inits.push(ExchangeInit {
                exchange: to,
                tokens: call.tokens,
                value: tx.value.unwrap_or_default(),
                gas: tx.gas,
            });
            Ok(())
        }
        None => Ok(()),
    }
}

#[async_trait]
impl ChainBackend for DevChain {
    async fn chain_id(&self) -> Result<u64, ChainError> {
        Ok(self.chain_id)
    }

    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        Ok(vec![DEV_DEPLOYER, DEV_SECOND_ACCOUNT])
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        let mut state = self.state.lock().unwrap();
        if self.advance_on_poll.load(Ordering::SeqCst) {
            state.head += 1;
        }
        Ok(state.head)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<B256, ChainError> {
        let deployed = match tx.to {
            None => self.classify(tx.data.as_ref().map(|d| d.as_ref()).unwrap_or(&[])),
            Some(_) => None,
        };

        let mut state = self.state.lock().unwrap();
        state.sent.push(tx.clone());
        let data = tx.data.clone().unwrap_or_default();
        if let Some(selector) = state.revert_selector {
            if data.starts_with(&selector) {
                return Err(revert("forced revert"));
            }
        }

        state.tx_count += 1;
        let hash = keccak256(state.tx_count.to_be_bytes());
        let contract_address = match tx.to {
            None => {
                let address = Address::with_last_byte(state.tx_count as u8);
                if let Some(deployed) = deployed {
                    if matches!(deployed, Deployed::Token) {
                        state.balances.insert(tx.from, token_supply().wei());
                    }
                    state.contracts.insert(address, deployed);
                }
                Some(address)
            }
            Some(to) => {
                apply_call(&mut state, &tx, to, &data)?;
                None
            }
        };

        state.head += 1;
        let receipt = TransactionReceipt {
            transaction_hash: hash,
            block_number: U64::from(state.head),
            contract_address,
            status: Some(U64::from(1)),
        };
        state.receipts.insert(hash, receipt);
        Ok(hash)
    }

    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, ChainError> {
        Ok(self.state.lock().unwrap().receipts.get(&hash).cloned())
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, ChainError> {
        if self.fail_calls.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc(RpcError::Node {
                code: -32000,
                message: "header not found".to_string(),
            }));
        }
        let state = self.state.lock().unwrap();
        let data = tx.data.unwrap_or_default();
        let call = IBalloons::balanceOfCall::abi_decode(&data, true)
            .map_err(|_| revert("unsupported call"))?;
        let balance = state
            .balances
            .get(&call.account)
            .copied()
            .unwrap_or_default();
        Ok(balance.abi_encode().into())
    }

    async fn logs(&self, filter: LogFilter) -> Result<Vec<RpcLog>, ChainError> {
        let state = self.state.lock().unwrap();
        let from = match filter.from_block {
            BlockTag::Number(n) => n,
            BlockTag::Latest => state.head,
        };
        let to = match filter.to_block {
            BlockTag::Number(n) => n,
            BlockTag::Latest => state.head,
        };
        let topic0 = filter.topics.first().copied().flatten();
        Ok(state
            .logs
            .iter()
            .filter(|log| log.address == filter.address)
            .filter(|log| topic0.is_none_or(|t| log.topics.first() == Some(&t)))
            .filter(|log| {
                let block = log.block_number.to::<u64>();
                block >= from && block <= to
            })
            .cloned()
            .collect())
    }
}
