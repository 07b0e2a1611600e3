use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Price returned by the contract for a booking, in the smallest unit of
/// the native currency. Used unchanged as the payment amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PriceEstimate(U256);

impl PriceEstimate {
    pub fn amount(self) -> U256 {
        self.0
    }
}

impl From<U256> for PriceEstimate {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<PriceEstimate> for U256 {
    fn from(value: PriceEstimate) -> Self {
        value.0
    }
}

impl fmt::Display for PriceEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}
