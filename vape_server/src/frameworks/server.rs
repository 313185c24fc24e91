// Framework bootstrap for the vape game server runtime.

use crate::domain::eligibility::HitGate;
use crate::domain::{ChainReader, WalletProvider};
use crate::frameworks::config::{self, Settings};
use crate::interface_adapters::abi::AbiRegistry;
use crate::interface_adapters::clients::{ContractClient, Endpoint, WalletClient};
use crate::interface_adapters::routes;
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::{ActionDesk, GameSnapshot, GameWatcher};

use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::watch;
use tokio::task::JoinHandle;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, settings: Settings) -> Result<()> {
    let address = listener.local_addr()?;
    let (state, poller) = build_state(settings).await?;
    let app = routes::app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    let served = axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    });
    poller.abort();
    served
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let settings = Settings::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
    })?;
    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, settings).await
}

async fn build_state(settings: Settings) -> Result<(Arc<AppState>, JoinHandle<()>)> {
    let abi = AbiRegistry::embedded()
        .map_err(|e| std::io::Error::other(format!("failed to load contract abis: {e}")))?;

    let node = Endpoint::connect(config::validate_url(&settings.rpc_url)?, settings.rpc_timeout);
    let wallet = Endpoint::connect(
        config::validate_url(&settings.wallet_rpc_url)?,
        settings.wallet_timeout,
    );

    // The node decides the active chain; the default only covers a silent node.
    let detected = match node.chain_id().await {
        Ok(chain_id) => Some(chain_id),
        Err(e) => {
            tracing::warn!(
                error = %e,
                default_chain_id = settings.default_chain_id,
                "chain id unavailable, using default"
            );
            None
        }
    };
    let chain = Arc::new(settings.chains.resolve(detected, settings.default_chain_id)?);
    tracing::info!(
        chain_id = chain.chain_id,
        chain = %chain.name,
        game = %chain.game_address,
        token = %chain.token_address,
        rpc_url = %settings.rpc_url,
        wallet_timeout_ms = settings.wallet_timeout.as_millis(),
        "chain configured"
    );

    let reader: Arc<dyn ChainReader> =
        Arc::new(ContractClient::new(node, Arc::new(abi), chain.clone()));
    let wallet: Arc<dyn WalletProvider> = Arc::new(WalletClient::new(wallet));

    // Single poller shared by every visitor.
    let (snapshot_tx, snapshot_rx) = watch::channel(GameSnapshot::default());
    let watcher = GameWatcher::new(reader.clone(), snapshot_tx, settings.poll_interval);
    let poller = tokio::spawn(watcher.run());
    tracing::debug!(
        poll_interval_ms = settings.poll_interval.as_millis(),
        "game watcher started"
    );

    let state = Arc::new(AppState {
        reader,
        wallet,
        clock: Arc::new(SystemClock),
        chain,
        desk: Arc::new(ActionDesk::default()),
        snapshot_rx,
        gate: HitGate::default(),
        hit_lookback_blocks: settings.hit_lookback_blocks,
    });

    Ok((state, poller))
}
