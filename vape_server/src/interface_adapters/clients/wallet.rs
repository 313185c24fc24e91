use crate::domain::{ChainError, PreparedCall, WalletProvider};
use crate::interface_adapters::clients::endpoint::Endpoint;
use alloy::primitives::TxHash;
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use async_trait::async_trait;

// Hands prepared calls to the user's wallet endpoint for signing and broadcast.
#[derive(Clone)]
pub struct WalletClient {
    wallet: Endpoint,
}

impl WalletClient {
    pub fn new(wallet: Endpoint) -> Self {
        Self { wallet }
    }
}

#[async_trait]
impl WalletProvider for WalletClient {
    async fn send_transaction(&self, prepared: PreparedCall) -> Result<TxHash, ChainError> {
        let tx = TransactionRequest::default()
            .from(prepared.from)
            .to(prepared.to)
            .value(prepared.value)
            .gas_limit(prepared.gas)
            .input(TransactionInput::new(prepared.data));

        let pending = self
            .wallet
            .request(
                "eth_sendTransaction",
                self.wallet.provider().send_transaction(tx),
            )
            .await?;

        Ok(*pending.tx_hash())
    }
}
