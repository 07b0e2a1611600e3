use std::fmt;

use hotel_cid::CidError;
use hotel_types::{TransactionOutcome, ValidationError};

use crate::api::ContractError;

/// Which estimate failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Price,
    Gas,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Price => f.write_str("price"),
            Self::Gas => f.write_str("gas"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Cid(#[from] CidError),

    #[error("{stage} estimation failed: {source}")]
    EstimationFailed {
        stage: Stage,
        #[source]
        source: ContractError,
    },

    #[error("gas estimate {0} leaves no room for the safety margin")]
    GasLimitOverflow(u64),

    #[error("{method} query failed: {source}")]
    QueryFailed {
        method: &'static str,
        #[source]
        source: ContractError,
    },

    /// The node declined the transaction before it was mined; no gas was spent.
    #[error("transaction rejected: {0}")]
    SubmissionRejected(#[source] ContractError),

    /// The transaction was mined but execution failed; gas was spent.
    #[error("transaction {} reverted", .0.hash)]
    TransactionReverted(TransactionOutcome),

    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),
}

impl Error {
    /// Classify a failed read-only call.
    pub fn query(method: &'static str, e: ContractError) -> Self {
        match e {
            ContractError::Transport(m) => Self::NetworkUnavailable(m),
            other => Self::QueryFailed {
                method,
                source: other,
            },
        }
    }

    pub fn is_estimation_failure(&self) -> bool {
        matches!(
            self,
            Self::EstimationFailed { .. } | Self::GasLimitOverflow(_)
        )
    }
}
