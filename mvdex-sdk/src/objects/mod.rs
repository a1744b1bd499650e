pub mod amount;
pub mod contracts;
pub mod events;
pub mod rpc;

pub use amount::{AmountError, EtherAmount};
pub use contracts::{ContractRegistry, DeployedContract};
pub use events::{EntryId, EventArg, EventEntry};
pub use rpc::{BlockTag, LogFilter, RpcLog, TransactionReceipt, TransactionRequest};
