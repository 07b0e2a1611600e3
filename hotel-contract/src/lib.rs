//! HotelBooking contract bindings and the transaction workflow around them.
//!
//! Reads go through [`HotelContract`]. State-changing calls are never sent
//! blind: the [`Estimator`] first asks the node for a price (bookings only)
//! and a gas estimate, then the [`Submitter`] sends the call with the padded
//! gas limit and waits for the receipt.

mod api;
mod bindings;
mod client;
mod error;
mod estimate;
mod submit;

pub mod provider;

#[cfg(any(test, feature = "test"))]
pub mod testing;

pub use api::{ContractCall, ContractError, HotelContract};
pub use bindings::{BookingSol, HotelBooking};
pub use client::HotelBookingClient;
pub use error::{Error, Stage};
pub use estimate::Estimator;
pub use submit::{Submitter, SubmitterConfig};
