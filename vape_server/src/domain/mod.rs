// Domain layer: derived values, the submission state machine and the ports
// the chain collaborators are reached through.

pub mod amount;
pub mod chain;
pub mod countdown;
pub mod eligibility;
pub mod ports;
pub mod reads;
pub mod tx_flow;

pub use chain::{ChainContext, ContractKind};
pub use ports::{ChainError, ChainReader, Clock, ContractCall, DecodedLog, PreparedCall, WalletProvider};
pub use reads::ReadState;
pub use tx_flow::{FlowError, TxFlow, TxPhase};
