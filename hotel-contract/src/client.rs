//! [`HotelContract`] backed by an alloy provider

use alloy::{
    network::{ReceiptResponse, TransactionBuilder},
    primitives::{Address, TxHash, U256},
    providers::Provider,
    rpc::types::TransactionRequest,
};
use async_trait::async_trait;
use hotel_types::{Booking, BookingRequest, HotelName, TransactionOutcome};
use tracing::debug;

use crate::{
    api::{ContractCall, ContractError, HotelContract},
    bindings::HotelBooking,
};

#[derive(Debug, Clone)]
pub struct HotelBookingClient<P> {
    provider: P,
    address: Address,
}

impl<P: Provider> HotelBookingClient<P> {
    pub fn new(provider: P, address: Address) -> Self {
        Self { provider, address }
    }

    fn request(&self, call: &ContractCall, from: Address, value: U256) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(from)
            .with_to(self.address)
            .with_value(value)
            .with_input(call.calldata())
    }
}

#[async_trait]
impl<P: Provider> HotelContract for HotelBookingClient<P> {
    async fn owner(&self) -> Result<Address, ContractError> {
        let c = HotelBooking::new(self.address, &self.provider);
        Ok(c.owner().call().await?)
    }

    async fn estimate_booking_price(&self, req: &BookingRequest) -> Result<U256, ContractError> {
        let c = HotelBooking::new(self.address, &self.provider);
        let price = c
            .estimateBookingPrice(
                req.hotel_name().to_string(),
                U256::from(req.room_type()),
                U256::from(req.booking_days()),
            )
            .call()
            .await?;
        Ok(price)
    }

    async fn hotel_bookings(&self, name: &HotelName) -> Result<Vec<Booking>, ContractError> {
        let c = HotelBooking::new(self.address, &self.provider);
        let bookings = c.getHotelBookings(name.to_string()).call().await?;
        Ok(bookings.into_iter().map(Booking::from).collect())
    }

    async fn ipfs_hash(&self, name: &HotelName) -> Result<String, ContractError> {
        let c = HotelBooking::new(self.address, &self.provider);
        Ok(c.getIPFShash(name.to_string()).call().await?)
    }

    async fn balance(&self, account: Address) -> Result<U256, ContractError> {
        Ok(self.provider.get_balance(account).await?)
    }

    async fn estimate_gas(
        &self,
        call: &ContractCall,
        from: Address,
        value: U256,
    ) -> Result<u64, ContractError> {
        let tx = self.request(call, from, value);
        Ok(self.provider.estimate_gas(tx).await?)
    }

    async fn send(
        &self,
        call: &ContractCall,
        from: Address,
        value: U256,
        gas_limit: u64,
    ) -> Result<TxHash, ContractError> {
        let tx = self.request(call, from, value).with_gas_limit(gas_limit);
        let pending = self.provider.send_transaction(tx).await?;
        Ok(*pending.tx_hash())
    }

    async fn receipt(&self, hash: TxHash) -> Result<Option<TransactionOutcome>, ContractError> {
        let Some(r) = self.provider.get_transaction_receipt(hash).await? else {
            debug!(%hash, "no receipt yet");
            return Ok(None);
        };
        Ok(Some(TransactionOutcome {
            hash: r.transaction_hash(),
            status: r.status().into(),
            gas_used: r.gas_used(),
            block_number: r.block_number(),
        }))
    }
}
