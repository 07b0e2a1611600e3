use serde::{Deserialize, Serialize};

/// Gas added on top of the node's estimate.
pub const GAS_SAFETY_MARGIN: u64 = 100_000;

/// Gas budget for a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasPlan {
    estimated_gas: u64,
    gas_limit: u64,
}

impl GasPlan {
    /// Pad an estimate with [`GAS_SAFETY_MARGIN`].
    ///
    /// Returns `None` if the padded limit does not fit into 64 bits.
    pub fn from_estimate(estimated_gas: u64) -> Option<Self> {
        let gas_limit = estimated_gas.checked_add(GAS_SAFETY_MARGIN)?;
        Some(Self {
            estimated_gas,
            gas_limit,
        })
    }

    pub fn estimated_gas(&self) -> u64 {
        self.estimated_gas
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }
}
