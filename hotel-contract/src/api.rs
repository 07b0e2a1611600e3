//! The narrow interface the client needs from the HotelBooking contract

use alloy::{
    primitives::{Address, B256, Bytes, TxHash, U256},
    sol_types::SolCall,
    transports::TransportError,
};
use async_trait::async_trait;
use hotel_cid::MultihashParts;
use hotel_types::{
    Booking, BookingRequest, HotelName, Registration, TransactionOutcome, ValidationError,
};

use crate::bindings::HotelBooking;

/// Failure reported by the contract collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// The node answered with an error (revert, insufficient funds, bad nonce, ...).
    #[error("node error: {0}")]
    Node(String),

    /// The node could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("abi error: {0}")]
    Abi(String),
}

impl From<TransportError> for ContractError {
    fn from(e: TransportError) -> Self {
        if let Some(resp) = e.as_error_resp() {
            Self::Node(resp.message.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<alloy::contract::Error> for ContractError {
    fn from(e: alloy::contract::Error) -> Self {
        match e {
            alloy::contract::Error::TransportError(e) => e.into(),
            other => Self::Abi(other.to_string()),
        }
    }
}

/// A state-changing contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    RegisterHotel(Registration),
    BookHotel(BookingRequest),
    SetIpfsHash {
        name: HotelName,
        hash_function: u8,
        hash_size: u8,
        digest: B256,
    },
}

impl ContractCall {
    /// Prepare a `setIPFSHash` call.
    ///
    /// The contract stores the digest as `bytes32`, so only 32-byte digests
    /// are accepted.
    pub fn set_ipfs_hash(name: HotelName, parts: &MultihashParts) -> Result<Self, ValidationError> {
        let digest = B256::try_from(parts.digest())
            .map_err(|_| ValidationError::DigestLength(parts.digest().len()))?;
        Ok(Self::SetIpfsHash {
            name,
            hash_function: parts.hash_function(),
            hash_size: parts.hash_size(),
            digest,
        })
    }

    /// Contract function name, for logging.
    pub fn method(&self) -> &'static str {
        match self {
            Self::RegisterHotel(_) => "registerHotel",
            Self::BookHotel(_) => "bookHotel",
            Self::SetIpfsHash { .. } => "setIPFSHash",
        }
    }

    pub fn hotel_name(&self) -> &HotelName {
        match self {
            Self::RegisterHotel(r) => r.name(),
            Self::BookHotel(b) => b.hotel_name(),
            Self::SetIpfsHash { name, .. } => name,
        }
    }

    /// ABI-encoded call data.
    pub fn calldata(&self) -> Bytes {
        let data = match self {
            Self::RegisterHotel(r) => HotelBooking::registerHotelCall {
                name: r.name().to_string(),
                price: r.price(),
            }
            .abi_encode(),
            Self::BookHotel(b) => HotelBooking::bookHotelCall {
                name: b.hotel_name().to_string(),
                roomType: U256::from(b.room_type()),
                bookingDays: U256::from(b.booking_days()),
            }
            .abi_encode(),
            Self::SetIpfsHash {
                name,
                hash_function,
                hash_size,
                digest,
            } => HotelBooking::setIPFSHashCall {
                name: name.to_string(),
                hashFunction: *hash_function,
                hashSize: *hash_size,
                digest: *digest,
            }
            .abi_encode(),
        };
        data.into()
    }
}

/// Read and write access to a deployed HotelBooking contract.
///
/// Every method is a network round trip.
#[async_trait]
pub trait HotelContract: Send + Sync {
    async fn owner(&self) -> Result<Address, ContractError>;

    async fn estimate_booking_price(&self, req: &BookingRequest) -> Result<U256, ContractError>;

    async fn hotel_bookings(&self, name: &HotelName) -> Result<Vec<Booking>, ContractError>;

    async fn ipfs_hash(&self, name: &HotelName) -> Result<String, ContractError>;

    async fn balance(&self, account: Address) -> Result<U256, ContractError>;

    /// Gas the node expects `call` to consume when sent by `from` with `value` attached.
    async fn estimate_gas(
        &self,
        call: &ContractCall,
        from: Address,
        value: U256,
    ) -> Result<u64, ContractError>;

    /// Send `call` and return once the node accepted it into its pool.
    async fn send(
        &self,
        call: &ContractCall,
        from: Address,
        value: U256,
        gas_limit: u64,
    ) -> Result<TxHash, ContractError>;

    /// The outcome of a mined transaction, `None` while it is still pending.
    async fn receipt(&self, hash: TxHash) -> Result<Option<TransactionOutcome>, ContractError>;
}
