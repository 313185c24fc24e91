use alloy::primitives::{Address, TxHash};
use std::fmt;

// The two contracts the page talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    Game,
    Token,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractKind::Game => write!(f, "VapeGame"),
            ContractKind::Token => write!(f, "ZoomerCoin"),
        }
    }
}

/// Deployment details for the active chain.
///
/// Resolved once at startup from the chain table and passed explicitly to
/// every client and use case that needs an address or an explorer link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainContext {
    pub chain_id: u64,
    pub name: String,
    pub explorer_url: String,
    pub game_address: Address,
    pub token_address: Address,
}

impl ChainContext {
    pub fn address_of(&self, contract: ContractKind) -> Address {
        match contract {
            ContractKind::Game => self.game_address,
            ContractKind::Token => self.token_address,
        }
    }

    pub fn address_link(&self, address: Address) -> String {
        format!("{}/address/{}", self.explorer_base(), address)
    }

    pub fn tx_link(&self, hash: TxHash) -> String {
        format!("{}/tx/{}", self.explorer_base(), hash)
    }

    pub fn game_contract_link(&self) -> String {
        self.address_link(self.game_address)
    }

    fn explorer_base(&self) -> &str {
        self.explorer_url.trim_end_matches('/')
    }
}
