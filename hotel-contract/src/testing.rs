//! In-memory stand-in for the HotelBooking contract.

use std::collections::HashMap;

use alloy::primitives::{Address, TxHash, U256, keccak256};
use async_trait::async_trait;
use hotel_cid::MultihashParts;
use hotel_types::{Booking, BookingRequest, HotelName, TransactionOutcome, TxStatus};
use parking_lot::Mutex;

use crate::api::{ContractCall, ContractError, HotelContract};

/// A call made against [`MockContract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Owner,
    EstimatePrice(BookingRequest),
    HotelBookings(HotelName),
    IpfsHash(HotelName),
    Balance(Address),
    EstimateGas {
        call: ContractCall,
        from: Address,
        value: U256,
    },
    Send {
        call: ContractCall,
        from: Address,
        value: U256,
        gas_limit: u64,
    },
    Receipt(TxHash),
}

impl Recorded {
    /// Gas estimation or sending, only done by state-changing flows.
    pub fn is_transaction(&self) -> bool {
        matches!(self, Self::EstimateGas { .. } | Self::Send { .. })
    }
}

#[derive(Debug)]
struct State {
    owner: Address,
    price: Result<U256, ContractError>,
    gas: Result<u64, ContractError>,
    send_error: Option<ContractError>,
    receipt_error: Option<ContractError>,
    receipt_status: bool,
    pending_polls: usize,
    polls: HashMap<TxHash, usize>,
    sent: u64,
    balance: U256,
    bookings: HashMap<HotelName, Vec<Booking>>,
    hashes: HashMap<HotelName, String>,
    calls: Vec<Recorded>,
}

/// Records every call and answers with configurable results.
///
/// Successful transactions take effect immediately: bookings are stored,
/// content hashes can be read back and the attached value is deducted
/// from the balance.
#[derive(Debug)]
pub struct MockContract {
    state: Mutex<State>,
}

impl Default for MockContract {
    fn default() -> Self {
        Self::new()
    }
}

impl MockContract {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                owner: Address::repeat_byte(0xaa),
                price: Ok(U256::ZERO),
                gas: Ok(21_000),
                send_error: None,
                receipt_error: None,
                receipt_status: true,
                pending_polls: 0,
                polls: HashMap::new(),
                sent: 0,
                balance: U256::from(1_000_000_000u64),
                bookings: HashMap::new(),
                hashes: HashMap::new(),
                calls: Vec::new(),
            }),
        }
    }

    pub fn with_owner(self, a: Address) -> Self {
        self.state.lock().owner = a;
        self
    }

    pub fn with_price(self, p: u64) -> Self {
        self.state.lock().price = Ok(U256::from(p));
        self
    }

    pub fn fail_price(self, e: ContractError) -> Self {
        self.state.lock().price = Err(e);
        self
    }

    pub fn with_gas(self, g: u64) -> Self {
        self.state.lock().gas = Ok(g);
        self
    }

    pub fn fail_gas(self, e: ContractError) -> Self {
        self.state.lock().gas = Err(e);
        self
    }

    pub fn fail_send(self, e: ContractError) -> Self {
        self.state.lock().send_error = Some(e);
        self
    }

    /// Every receipt query fails with `e`.
    pub fn fail_receipt(self, e: ContractError) -> Self {
        self.state.lock().receipt_error = Some(e);
        self
    }

    pub fn with_receipt_status(self, ok: bool) -> Self {
        self.state.lock().receipt_status = ok;
        self
    }

    /// Number of receipt queries answered with "pending" before the receipt appears.
    pub fn with_pending_polls(self, n: usize) -> Self {
        self.state.lock().pending_polls = n;
        self
    }

    pub fn with_balance(self, b: U256) -> Self {
        self.state.lock().balance = b;
        self
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.state.lock().calls.clone()
    }
}

impl State {
    fn apply(&mut self, call: &ContractCall, from: Address, value: U256) {
        self.balance = self.balance.saturating_sub(value);
        match call {
            ContractCall::RegisterHotel(r) => {
                self.bookings.entry(r.name().clone()).or_default();
            }
            ContractCall::BookHotel(b) => {
                self.bookings
                    .entry(b.hotel_name().clone())
                    .or_default()
                    .push(Booking {
                        customer: from,
                        room_type: U256::from(b.room_type()),
                        booking_days: U256::from(b.booking_days()),
                    });
            }
            ContractCall::SetIpfsHash {
                name,
                hash_function,
                hash_size,
                digest,
            } => {
                if let Ok(p) = MultihashParts::new(*hash_function, *hash_size, digest.to_vec()) {
                    self.hashes.insert(name.clone(), p.to_cid().to_string());
                }
            }
        }
    }
}

#[async_trait]
impl HotelContract for MockContract {
    async fn owner(&self) -> Result<Address, ContractError> {
        let mut s = self.state.lock();
        s.calls.push(Recorded::Owner);
        Ok(s.owner)
    }

    async fn estimate_booking_price(&self, req: &BookingRequest) -> Result<U256, ContractError> {
        let mut s = self.state.lock();
        s.calls.push(Recorded::EstimatePrice(req.clone()));
        s.price.clone()
    }

    async fn hotel_bookings(&self, name: &HotelName) -> Result<Vec<Booking>, ContractError> {
        let mut s = self.state.lock();
        s.calls.push(Recorded::HotelBookings(name.clone()));
        Ok(s.bookings.get(name).cloned().unwrap_or_default())
    }

    async fn ipfs_hash(&self, name: &HotelName) -> Result<String, ContractError> {
        let mut s = self.state.lock();
        s.calls.push(Recorded::IpfsHash(name.clone()));
        Ok(s.hashes.get(name).cloned().unwrap_or_default())
    }

    async fn balance(&self, account: Address) -> Result<U256, ContractError> {
        let mut s = self.state.lock();
        s.calls.push(Recorded::Balance(account));
        Ok(s.balance)
    }

    async fn estimate_gas(
        &self,
        call: &ContractCall,
        from: Address,
        value: U256,
    ) -> Result<u64, ContractError> {
        let mut s = self.state.lock();
        s.calls.push(Recorded::EstimateGas {
            call: call.clone(),
            from,
            value,
        });
        s.gas.clone()
    }

    async fn send(
        &self,
        call: &ContractCall,
        from: Address,
        value: U256,
        gas_limit: u64,
    ) -> Result<TxHash, ContractError> {
        let mut s = self.state.lock();
        s.calls.push(Recorded::Send {
            call: call.clone(),
            from,
            value,
            gas_limit,
        });
        if let Some(e) = &s.send_error {
            return Err(e.clone());
        }
        s.sent += 1;
        let hash = keccak256(s.sent.to_be_bytes());
        if s.receipt_status {
            s.apply(call, from, value)
        }
        s.polls.insert(hash, 0);
        Ok(hash)
    }

    async fn receipt(&self, hash: TxHash) -> Result<Option<TransactionOutcome>, ContractError> {
        let mut s = self.state.lock();
        s.calls.push(Recorded::Receipt(hash));
        if let Some(e) = &s.receipt_error {
            return Err(e.clone());
        }
        let pending = s.pending_polls;
        let status = s.receipt_status;
        let Some(n) = s.polls.get_mut(&hash) else {
            return Ok(None);
        };
        if *n < pending {
            *n += 1;
            return Ok(None);
        }
        Ok(Some(TransactionOutcome {
            hash,
            status: TxStatus::from(status),
            gas_used: 21_000,
            block_number: Some(1),
        }))
    }
}
