// Shared primitives for one-time server bootstrapping across integration tests.
use std::{
    // `Arc` shares data between threads; `OnceLock` writes a value only once.
    sync::{Arc, OnceLock},
    // Sleep durations are used in readiness polling loops.
    time::Duration,
};

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, TxHash, U256, hex};
use axum::{Json, Router, extract::State, routing::post};
use serde_json::{Value, json};
use vape_server::Settings;
use vape_server::domain::ContractKind;
use vape_server::frameworks::config::ChainTable;
use vape_server::interface_adapters::abi::AbiRegistry;

// Hash every fake wallet submission returns.
pub const SUBMITTED_TX: TxHash = TxHash::repeat_byte(0xab);
// Last hitter reported by the fake node.
pub const LAST_HITTER: Address = Address::repeat_byte(0x77);
// Block the single fake TookAHit log was emitted in.
pub const HIT_BLOCK: u64 = 0x60;
pub const ETH: u128 = 1_000_000_000_000_000_000;

// Global base URL used by all tests after the server publishes its bound address.
static SERVER_URL: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Ensure the test server is running and return the shared base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // The fake node must be answering before the server asks it for the chain id.
                let node_url = spawn_fake_node().await;

                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));

                vape_server::run(listener, test_settings(node_url))
                    .await
                    .expect("server failed");
            });
        });
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

fn test_settings(node_url: String) -> Settings {
    Settings {
        rpc_url: node_url.clone(),
        wallet_rpc_url: node_url,
        rpc_timeout: Duration::from_secs(2),
        wallet_timeout: Duration::from_secs(30),
        poll_interval: Duration::from_millis(50),
        default_chain_id: 1,
        chains: ChainTable::embedded().expect("bundled chain table"),
        hit_lookback_blocks: 5000,
    }
}

// Wait for URL publication and then wait for the server socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    // Retry for a short period to avoid racing server bind/accept.
    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}

// Minimal JSON-RPC node serving a goerli deployment with fixed state.
struct FakeNode {
    abi: AbiRegistry,
    token_address: Address,
}

async fn spawn_fake_node() -> String {
    let chains = ChainTable::embedded().expect("bundled chain table");
    let goerli = chains.get(5).expect("goerli deployment");
    let node = Arc::new(FakeNode {
        abi: AbiRegistry::embedded().expect("embedded abis"),
        token_address: goerli.token_address,
    });

    let app = Router::new().route("/", post(rpc)).with_state(node);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake node");
    let addr = listener.local_addr().expect("fake node addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake node failed");
    });

    format!("http://{addr}")
}

async fn rpc(State(node): State<Arc<FakeNode>>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let params = &request["params"];

    let outcome = match request["method"].as_str().unwrap_or_default() {
        "eth_chainId" => Ok(json!("0x5")),
        "eth_blockNumber" => Ok(json!("0x64")),
        "eth_estimateGas" => Ok(json!("0x5208")),
        "eth_sendTransaction" => Ok(json!(SUBMITTED_TX.to_string())),
        "eth_call" => node.call(&params[0]),
        "eth_getLogs" => Ok(node.hit_logs()),
        other => Err(format!("method {other} not supported")),
    };

    Json(match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(message) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32601, "message": message },
        }),
    })
}

impl FakeNode {
    fn call(&self, tx: &Value) -> Result<Value, String> {
        let to: Address = tx["to"]
            .as_str()
            .and_then(|raw| raw.parse().ok())
            .ok_or("missing to")?;
        let data = tx["input"]
            .as_str()
            .or_else(|| tx["data"].as_str())
            .and_then(|raw| hex::decode(raw).ok())
            .ok_or("missing data")?;
        let contract = if to == self.token_address {
            ContractKind::Token
        } else {
            ContractKind::Game
        };
        let selector = data
            .get(..4)
            .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok())
            .ok_or("short calldata")?;
        let function = self
            .abi
            .function_by_selector(contract, selector.into())
            .ok_or("unknown selector")?;

        let uint = |value: u128| DynSolValue::Uint(U256::from(value), 256);
        let value = match function.name.as_str() {
            "potValueETH" => uint(3 * ETH / 2),
            "lastPurchasedTime" => uint(0),
            "lastPurchasedAddress" => DynSolValue::Address(LAST_HITTER),
            "numHits" => uint(12),
            "minInvest" => uint(ETH / 100),
            "isPaused" => DynSolValue::Bool(false),
            "GAME_TIME" => uint(86_400),
            "getMyDividend" => uint(ETH / 200),
            "hasEnoughZoomer" => DynSolValue::Bool(true),
            "balanceOf" => uint(20_000 * ETH),
            other => return Err(format!("{other} not scripted")),
        };

        Ok(json!(hex::encode_prefixed(value.abi_encode())))
    }

    fn hit_logs(&self) -> Value {
        let topic = self
            .abi
            .event_topic(ContractKind::Game, "TookAHit")
            .expect("TookAHit topic");
        let user = LAST_HITTER.into_word();
        let uint = |value: u128| DynSolValue::Uint(U256::from(value), 256);
        let data = DynSolValue::Tuple(vec![
            uint(ETH / 100),
            uint(42),
            uint(3 * ETH / 2),
            uint(0),
            uint(0),
            uint(ETH / 50),
        ])
        .abi_encode_params();

        json!([{
            "address": "0x0000000000000000000000000000000000000000",
            "topics": [topic.to_string(), user.to_string()],
            "data": hex::encode_prefixed(data),
            "blockHash": TxHash::repeat_byte(0x61).to_string(),
            "blockNumber": format!("0x{HIT_BLOCK:x}"),
            "blockTimestamp": null,
            "transactionHash": TxHash::repeat_byte(0x60).to_string(),
            "transactionIndex": "0x0",
            "logIndex": "0x0",
            "removed": false,
        }])
    }
}
