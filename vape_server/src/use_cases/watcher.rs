// Background poller for the "watch" reads shared by every visitor.

use crate::domain::{ChainReader, ContractCall, ReadState};
use crate::use_cases::reads::{read_address, read_bool, read_seconds, read_uint};
use crate::use_cases::types::GameSnapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

pub struct GameWatcher {
    reader: Arc<dyn ChainReader>,
    snapshot_tx: watch::Sender<GameSnapshot>,
    poll_interval: Duration,
}

impl GameWatcher {
    pub fn new(
        reader: Arc<dyn ChainReader>,
        snapshot_tx: watch::Sender<GameSnapshot>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            reader,
            snapshot_tx,
            poll_interval,
        }
    }

    /// Reads every watched value once and publishes the merged snapshot.
    ///
    /// A read that fails keeps the last value it resolved to, so a flaky node
    /// does not blank out the page between polls.
    pub async fn refresh(&self) -> GameSnapshot {
        let reader = self.reader.as_ref();
        let (pot, last_time, last_address, hits, min_invest, paused, game_time) = tokio::join!(
            read_uint(reader, ContractCall::game("potValueETH")),
            read_seconds(reader, ContractCall::game("lastPurchasedTime")),
            read_address(reader, ContractCall::game("lastPurchasedAddress")),
            read_uint(reader, ContractCall::game("numHits")),
            read_uint(reader, ContractCall::game("minInvest")),
            read_bool(reader, ContractCall::game("isPaused")),
            read_seconds(reader, ContractCall::game("GAME_TIME")),
        );

        let previous = self.snapshot_tx.borrow().clone();
        let snapshot = GameSnapshot {
            pot_value: ReadState::from(pot).or_previous(previous.pot_value),
            last_purchased_time: ReadState::from(last_time).or_previous(previous.last_purchased_time),
            last_purchased_address: ReadState::from(last_address)
                .or_previous(previous.last_purchased_address),
            num_hits: ReadState::from(hits).or_previous(previous.num_hits),
            min_invest: ReadState::from(min_invest).or_previous(previous.min_invest),
            is_paused: ReadState::from(paused).or_previous(previous.is_paused),
            round_length: ReadState::from(game_time).or_previous(previous.round_length),
        };

        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let snapshot = self.refresh().await;
            tracing::debug!(
                pot_ready = snapshot.pot_value.is_ready(),
                timer_ready = snapshot.last_purchased_time.is_ready(),
                "game snapshot refreshed"
            );
        }
    }
}
