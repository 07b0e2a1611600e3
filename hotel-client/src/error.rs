use std::fmt;

use hotel_cid::CidError;
use hotel_types::ValidationError;

/// Error categories a user interface needs to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedIdentifier,
    UnsupportedMultihashPrefix,
    Validation,
    EstimationFailed,
    SubmissionRejected,
    TransactionReverted,
    NetworkUnavailable,
    QueryFailed,
    StoreFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MalformedIdentifier => "malformed identifier",
            Self::UnsupportedMultihashPrefix => "unsupported multihash prefix",
            Self::Validation => "validation error",
            Self::EstimationFailed => "estimation failed",
            Self::SubmissionRejected => "submission rejected",
            Self::TransactionReverted => "transaction reverted",
            Self::NetworkUnavailable => "network unavailable",
            Self::QueryFailed => "query failed",
            Self::StoreFailed => "file store error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Contract(#[from] hotel_contract::Error),

    #[error("file store: {0}")]
    Store(#[from] hotel_store::Error),
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Contract(e.into())
    }
}

impl From<CidError> for Error {
    fn from(e: CidError) -> Self {
        Self::Contract(e.into())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        use hotel_contract::Error as C;

        match self {
            Self::Contract(C::Validation(_)) => ErrorKind::Validation,
            Self::Contract(C::Cid(CidError::MalformedIdentifier(_))) => {
                ErrorKind::MalformedIdentifier
            }
            Self::Contract(C::Cid(CidError::UnsupportedMultihashPrefix(_))) => {
                ErrorKind::UnsupportedMultihashPrefix
            }
            Self::Contract(C::EstimationFailed { .. } | C::GasLimitOverflow(_)) => {
                ErrorKind::EstimationFailed
            }
            Self::Contract(C::QueryFailed { .. }) => ErrorKind::QueryFailed,
            Self::Contract(C::SubmissionRejected(_)) => ErrorKind::SubmissionRejected,
            Self::Contract(C::TransactionReverted(_)) => ErrorKind::TransactionReverted,
            Self::Contract(C::NetworkUnavailable(_)) => ErrorKind::NetworkUnavailable,
            Self::Store(hotel_store::Error::Identifier(_)) => ErrorKind::MalformedIdentifier,
            Self::Store(e) if e.is_unavailable() => ErrorKind::NetworkUnavailable,
            Self::Store(_) => ErrorKind::StoreFailed,
        }
    }
}
