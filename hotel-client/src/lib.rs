//! Client of the HotelBooking contract and its file store.
//!
//! A [`Session`] bundles the signing account, the contract and the file
//! store. [`connect`] builds one from a [`ClientConfig`].
//!
//! [`ClientConfig`]: hotel_config::ClientConfig

mod connect;
mod error;
mod logging;
mod session;

pub use connect::{ConnectError, HotelSession, connect};
pub use error::{Error, ErrorKind};
pub use logging::init_logging;
pub use session::{Action, Progress, Session};
