mod booking;
mod gas;
mod outcome;
mod price;

pub use booking::{Booking, BookingRequest, HotelName, Registration, ValidationError};
pub use gas::{GAS_SAFETY_MARGIN, GasPlan};
pub use outcome::{SubmissionState, TransactionOutcome, TxStatus};
pub use price::PriceEstimate;

pub use alloy_primitives::{Address, TxHash, U256};
