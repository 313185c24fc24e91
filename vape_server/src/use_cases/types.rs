// Use-case level inputs/outputs shared by the watcher, views and actions.

use crate::domain::ReadState;
use crate::domain::countdown::DEFAULT_ROUND_LENGTH_SECS;
use alloy::primitives::{Address, TxHash, U256};
use std::fmt;
use std::str::FromStr;

/// Contract state shared by every visitor, refreshed by the watcher.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameSnapshot {
    pub pot_value: ReadState<U256>,
    pub last_purchased_time: ReadState<u64>,
    pub last_purchased_address: ReadState<Address>,
    pub num_hits: ReadState<U256>,
    pub min_invest: ReadState<U256>,
    pub is_paused: ReadState<bool>,
    // On-chain GAME_TIME.
    pub round_length: ReadState<u64>,
}

impl GameSnapshot {
    pub fn round_length_or_default(&self) -> u64 {
        self.round_length
            .ready()
            .copied()
            .unwrap_or(DEFAULT_ROUND_LENGTH_SECS)
    }

    // Unknown counts as not paused.
    pub fn paused(&self) -> bool {
        matches!(self.is_paused, ReadState::Ready(true))
    }

    pub fn ticket_price(&self) -> Option<U256> {
        self.min_invest.ready().copied().filter(|price| !price.is_zero())
    }
}

// Per-player reads, issued on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerSnapshot {
    pub token_balance: ReadState<U256>,
    pub dividend: ReadState<U256>,
    pub has_enough_zoomer: ReadState<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    TakeAHit,
    ClaimDividend,
}

impl GameAction {
    pub fn function(&self) -> &'static str {
        match self {
            GameAction::TakeAHit => "takeAVapeHit",
            GameAction::ClaimDividend => "payMyDividend",
        }
    }

    // Label recorded with the recent transaction.
    pub fn description(&self) -> &'static str {
        match self {
            GameAction::TakeAHit => "Take a Hit",
            GameAction::ClaimDividend => "Get My Dividend",
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            GameAction::TakeAHit => "TAKE A HIT",
            GameAction::ClaimDividend => "GET MY DIVIDEND",
        }
    }

    pub fn dialog_title(&self) -> &'static str {
        match self {
            GameAction::TakeAHit => "YOU TOOK A FAT HIT",
            GameAction::ClaimDividend => "YOU COLLECTED YOUR DIVIDEND",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            GameAction::TakeAHit => "hit",
            GameAction::ClaimDividend => "dividend",
        }
    }
}

impl fmt::Display for GameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl FromStr for GameAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hit" => Ok(GameAction::TakeAHit),
            "dividend" => Ok(GameAction::ClaimDividend),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentTransaction {
    pub hash: TxHash,
    pub description: &'static str,
    pub submitted_at: u64,
}
