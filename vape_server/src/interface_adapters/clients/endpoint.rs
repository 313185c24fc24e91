use crate::domain::ChainError;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::transports::TransportError;
use std::future::IntoFuture;
use std::time::Duration;
use url::Url;

// EIP-1193 "user rejected the request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// A JSON-RPC endpoint (node or wallet) with a deadline on every request.
#[derive(Clone)]
pub struct Endpoint {
    provider: DynProvider,
    timeout: Duration,
}

impl Endpoint {
    pub fn connect(url: Url, timeout: Duration) -> Self {
        // No fillers: nonce, fees and signing belong to the wallet.
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_http(url)
            .erased();

        Self { provider, timeout }
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    pub async fn request<T, F>(&self, method: &'static str, call: F) -> Result<T, ChainError>
    where
        F: IntoFuture<Output = Result<T, TransportError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(classify),
            Err(_) => Err(ChainError::Transport(format!(
                "{method} timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }

    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        self.request("eth_chainId", self.provider.get_chain_id())
            .await
    }
}

pub fn classify(err: TransportError) -> ChainError {
    if let Some(payload) = err.as_error_resp() {
        return upstream(payload.code, payload.message.to_string());
    }
    if err.is_ser_error() || err.is_deser_error() {
        return ChainError::Decode(err.to_string());
    }
    ChainError::Transport(err.to_string())
}

// Error object returned inside a JSON-RPC response.
pub fn upstream(code: i64, message: String) -> ChainError {
    if code == USER_REJECTED_CODE {
        ChainError::Rejected(message)
    } else {
        ChainError::Rpc { code, message }
    }
}
