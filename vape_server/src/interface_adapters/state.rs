use crate::domain::eligibility::HitGate;
use crate::domain::{ChainContext, ChainReader, Clock, WalletProvider};
use crate::use_cases::{ActionDesk, GameSnapshot};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::watch;

// Shared state handed to every handler.
pub struct AppState {
    pub reader: Arc<dyn ChainReader>,
    pub wallet: Arc<dyn WalletProvider>,
    pub clock: Arc<dyn Clock>,
    // Active chain, resolved once at startup.
    pub chain: Arc<ChainContext>,
    pub desk: Arc<ActionDesk>,
    // Latest snapshot published by the watcher.
    pub snapshot_rx: watch::Receiver<GameSnapshot>,
    pub gate: HitGate,
    pub hit_lookback_blocks: u64,
}

impl AppState {
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshot_rx.borrow().clone()
    }
}

#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
