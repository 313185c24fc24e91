use crate::domain::amount::{format_ether, token_units};
use alloy::primitives::U256;

// Minimum $ZOOMER holding required for the early hits.
pub const MIN_ZOOMER_UNITS: u64 = 10_000;

// True iff the balance meets the threshold. The contract makes the final call.
pub fn is_eligible(balance: U256, threshold: U256) -> bool {
    balance >= threshold
}

/// Advisory gate for the "take a hit" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitGate {
    pub threshold: U256,
}

impl Default for HitGate {
    fn default() -> Self {
        Self {
            threshold: token_units(MIN_ZOOMER_UNITS),
        }
    }
}

impl HitGate {
    pub fn allows(&self, balance: U256) -> bool {
        is_eligible(balance, self.threshold)
    }

    pub fn required_display(&self) -> String {
        format_ether(self.threshold)
    }
}
