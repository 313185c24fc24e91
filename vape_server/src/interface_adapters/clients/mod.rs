// Outbound clients for the chain node and the wallet provider.

pub mod contract;
pub mod endpoint;
pub mod wallet;

pub use contract::ContractClient;
pub use endpoint::Endpoint;
pub use wallet::WalletClient;
