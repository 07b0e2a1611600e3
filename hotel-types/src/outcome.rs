use std::fmt;

use alloy_primitives::TxHash;
use serde::{Deserialize, Serialize};

/// Execution status taken from a transaction receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failure,
}

impl From<bool> for TxStatus {
    fn from(ok: bool) -> Self {
        if ok { Self::Success } else { Self::Failure }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Failure => f.write_str("failure"),
        }
    }
}

/// What became of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub hash: TxHash,
    pub status: TxStatus,
    pub gas_used: u64,
    pub block_number: Option<u64>,
}

impl TransactionOutcome {
    pub fn is_success(&self) -> bool {
        self.status == TxStatus::Success
    }
}

impl fmt::Display for TransactionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transaction {} {}", self.hash, self.status)?;
        if let Some(n) = self.block_number {
            write!(f, " in block {n}")?
        }
        write!(f, " (gas used: {})", self.gas_used)
    }
}

/// Stages of a single mutating contract call.
///
/// ```text
/// Idle -> Estimating -> Planning -> Submitting -> Pending -> Confirmed
///                                                         -> Reverted
///                                              -> Rejected
/// ```
///
/// Calls without a price skip `Estimating`. Any stage before `Pending` may
/// end in `Rejected` when the node refuses or estimation fails. A send that
/// fails to reach the node stays in `Submitting`, since it is unknown
/// whether the node accepted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionState {
    Idle,
    Estimating,
    Planning,
    Submitting,
    Pending,
    Confirmed,
    Reverted,
    Rejected,
}

impl SubmissionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Reverted | Self::Rejected)
    }

    pub fn can_advance_to(self, next: Self) -> bool {
        use SubmissionState::*;

        matches!(
            (self, next),
            (Idle, Estimating | Planning)
                | (Estimating, Planning)
                | (Planning, Submitting)
                | (Submitting, Pending)
                | (Pending, Confirmed | Reverted)
                | (Idle | Estimating | Planning | Submitting, Rejected)
        )
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Estimating => "estimating",
            Self::Planning => "planning",
            Self::Submitting => "submitting",
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Reverted => "reverted",
            Self::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::SubmissionState::{self, *};

    const ALL: [SubmissionState; 8] = [
        Idle, Estimating, Planning, Submitting, Pending, Confirmed, Reverted, Rejected,
    ];

    #[test]
    fn terminal_states_are_final() {
        for s in ALL.into_iter().filter(|s| s.is_terminal()) {
            assert!(ALL.iter().all(|n| !s.can_advance_to(*n)), "{s}");
        }
    }

    #[test]
    fn pending_never_rejected() {
        assert!(!Pending.can_advance_to(Rejected));
        assert!(!Submitting.can_advance_to(Confirmed));
        assert!(Idle.can_advance_to(Planning));
        assert!(Pending.can_advance_to(Reverted));
    }
}
