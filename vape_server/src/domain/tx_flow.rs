// Submission state machine for a single action button.

use alloy::primitives::TxHash;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxPhase {
    Idle,
    /// Waiting on the wallet for a signature.
    Submitting,
    /// Hash known; the confirmation dialog is open.
    Confirming { hash: TxHash },
    /// Dialog dismissed after a submission.
    Settled { hash: TxHash },
    Error { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    InFlight,
    InvalidTransition { from: &'static str, event: &'static str },
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::InFlight => write!(f, "a submission is already in flight"),
            FlowError::InvalidTransition { from, event } => {
                write!(f, "cannot apply {event} while {from}")
            }
        }
    }
}

impl std::error::Error for FlowError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxFlow {
    phase: TxPhase,
}

impl Default for TxFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl TxFlow {
    pub fn new() -> Self {
        Self {
            phase: TxPhase::Idle,
        }
    }

    pub fn phase(&self) -> &TxPhase {
        &self.phase
    }

    pub fn phase_name(&self) -> &'static str {
        match self.phase {
            TxPhase::Idle => "idle",
            TxPhase::Submitting => "submitting",
            TxPhase::Confirming { .. } => "confirming",
            TxPhase::Settled { .. } => "settled",
            TxPhase::Error { .. } => "error",
        }
    }

    // Only an in-flight submission blocks the button.
    pub fn can_submit(&self) -> bool {
        !self.is_busy()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, TxPhase::Submitting)
    }

    pub fn begin(&mut self) -> Result<(), FlowError> {
        if self.is_busy() {
            return Err(FlowError::InFlight);
        }
        self.phase = TxPhase::Submitting;
        Ok(())
    }

    pub fn signed(&mut self, hash: TxHash) -> Result<(), FlowError> {
        match self.phase {
            TxPhase::Submitting => {
                self.phase = TxPhase::Confirming { hash };
                Ok(())
            }
            _ => Err(self.invalid("signed")),
        }
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), FlowError> {
        match self.phase {
            TxPhase::Submitting | TxPhase::Confirming { .. } => {
                self.phase = TxPhase::Error {
                    reason: reason.into(),
                };
                Ok(())
            }
            _ => Err(self.invalid("fail")),
        }
    }

    /// Closes the dialog. A no-op when no dialog is open.
    pub fn dismiss(&mut self) {
        if let TxPhase::Confirming { hash } = self.phase {
            self.phase = TxPhase::Settled { hash };
        }
    }

    pub fn reset(&mut self) {
        if matches!(self.phase, TxPhase::Error { .. }) {
            self.phase = TxPhase::Idle;
        }
    }

    pub fn dialog_hash(&self) -> Option<TxHash> {
        match self.phase {
            TxPhase::Confirming { hash } => Some(hash),
            _ => None,
        }
    }

    // Idle, settled or failed: nothing worth remembering for this button.
    pub fn is_at_rest(&self) -> bool {
        !self.is_busy() && self.dialog_hash().is_none()
    }

    fn invalid(&self, event: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            from: self.phase_name(),
            event,
        }
    }
}
