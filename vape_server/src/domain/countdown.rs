// Round timer derived from the contract's last purchase timestamp.

/// Round length observed on the deployed contract (24h).
pub const DEFAULT_ROUND_LENGTH_SECS: u64 = 86_400;

const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_MINUTE: u64 = 60;

/// Derived timer for the current round. Never stored; rebuilt on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTimer {
    pub last_purchased: u64,
    pub round_length: u64,
}

impl RoundTimer {
    pub fn new(last_purchased: u64, round_length: u64) -> Self {
        Self {
            last_purchased,
            round_length,
        }
    }

    /// Seconds until the round expires, clamped at zero once it has.
    pub fn remaining_at(&self, now: u64) -> u64 {
        remaining_seconds(self.last_purchased, self.round_length, now)
    }

    pub fn display_at(&self, now: u64) -> String {
        format_hms(self.remaining_at(now))
    }
}

// max(0, last_purchased + round_length - now) without wrapping.
pub fn remaining_seconds(last_purchased: u64, round_length: u64, now: u64) -> u64 {
    last_purchased
        .saturating_add(round_length)
        .saturating_sub(now)
}

pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / SECS_PER_HOUR;
    let minutes = (seconds % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let secs = seconds % SECS_PER_MINUTE;
    format!("{hours} hours {minutes} minutes {secs} seconds")
}

/// Countdown string for a round of the default length.
pub fn countdown(last_purchased: u64, now: u64) -> String {
    RoundTimer::new(last_purchased, DEFAULT_ROUND_LENGTH_SECS).display_at(now)
}
