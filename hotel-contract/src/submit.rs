use std::{sync::Arc, time::Duration};

use alloy::primitives::{Address, TxHash, U256};
use bon::Builder;
use hotel_cid::MultihashParts;
use hotel_types::{
    BookingRequest, GasPlan, HotelName, PriceEstimate, Registration, TransactionOutcome,
};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::{
    api::{ContractCall, ContractError, HotelContract},
    error::Error,
};

#[derive(Debug, Clone, Copy, Builder)]
pub struct SubmitterConfig {
    /// How long to wait for a receipt after the node accepted a transaction.
    #[builder(default = Duration::from_secs(120))]
    pub receipt_timeout: Duration,

    /// Delay between receipt queries.
    #[builder(default = Duration::from_secs(1))]
    pub poll_interval: Duration,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Sends state-changing calls and waits for their receipts.
///
/// Nothing is retried: a transaction is sent at most once per call.
#[derive(Debug)]
pub struct Submitter<C: ?Sized> {
    config: SubmitterConfig,
    contract: Arc<C>,
}

impl<C: ?Sized> Clone for Submitter<C> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            contract: self.contract.clone(),
        }
    }
}

impl<C: HotelContract + ?Sized> Submitter<C> {
    pub fn new(contract: Arc<C>, config: SubmitterConfig) -> Self {
        Self { config, contract }
    }

    /// Book a room, paying `price`.
    pub async fn submit_booking(
        &self,
        req: &BookingRequest,
        plan: GasPlan,
        price: PriceEstimate,
        caller: Address,
    ) -> Result<TransactionOutcome, Error> {
        let call = ContractCall::BookHotel(req.clone());
        let hash = self.send(&call, price.amount(), plan, caller).await?;
        self.wait(&call, hash).await
    }

    /// Register a hotel. No value is attached.
    pub async fn submit_registration(
        &self,
        reg: &Registration,
        plan: GasPlan,
        caller: Address,
    ) -> Result<TransactionOutcome, Error> {
        let call = ContractCall::RegisterHotel(reg.clone());
        let hash = self.send(&call, U256::ZERO, plan, caller).await?;
        self.wait(&call, hash).await
    }

    /// Store a content hash for a hotel. No value is attached.
    pub async fn attach_content_hash(
        &self,
        name: &HotelName,
        parts: &MultihashParts,
        plan: GasPlan,
        caller: Address,
    ) -> Result<TransactionOutcome, Error> {
        let call = ContractCall::set_ipfs_hash(name.clone(), parts)?;
        let hash = self.send(&call, U256::ZERO, plan, caller).await?;
        self.wait(&call, hash).await
    }

    /// Send `call` and return its hash once the node accepted it.
    pub async fn send(
        &self,
        call: &ContractCall,
        value: U256,
        plan: GasPlan,
        caller: Address,
    ) -> Result<TxHash, Error> {
        debug!(
            method = %call.method(),
            hotel  = %call.hotel_name(),
            %value,
            gas    = %plan.gas_limit(),
            "sending transaction"
        );
        match self
            .contract
            .send(call, caller, value, plan.gas_limit())
            .await
        {
            Ok(hash) => {
                info!(method = %call.method(), %hash, "transaction accepted");
                Ok(hash)
            }
            Err(ContractError::Transport(m)) => {
                warn!(method = %call.method(), err = %m, "could not send transaction");
                Err(Error::NetworkUnavailable(m))
            }
            Err(err) => {
                warn!(method = %call.method(), %err, "transaction rejected");
                Err(Error::SubmissionRejected(err))
            }
        }
    }

    /// Wait until the transaction `hash` is mined and classify its receipt.
    ///
    /// Transport failures are retried until the receipt timeout, any other
    /// error while fetching the receipt ends the wait.
    pub async fn wait(&self, call: &ContractCall, hash: TxHash) -> Result<TransactionOutcome, Error> {
        let deadline = Instant::now() + self.config.receipt_timeout;
        let mut last_error = None;
        loop {
            match self.contract.receipt(hash).await {
                Ok(Some(outcome)) if outcome.is_success() => {
                    info!(method = %call.method(), %outcome, "transaction confirmed");
                    return Ok(outcome);
                }
                Ok(Some(outcome)) => {
                    warn!(method = %call.method(), %outcome, "transaction reverted");
                    return Err(Error::TransactionReverted(outcome));
                }
                Ok(None) => {}
                Err(ContractError::Transport(m)) => {
                    warn!(method = %call.method(), %hash, err = %m, "failed to fetch receipt");
                    last_error = Some(m)
                }
                Err(err) => {
                    warn!(method = %call.method(), %hash, %err, "invalid receipt");
                    return Err(Error::QueryFailed {
                        method: "eth_getTransactionReceipt",
                        source: err,
                    });
                }
            }
            if Instant::now() + self.config.poll_interval > deadline {
                let mut msg = format!(
                    "no receipt for transaction {hash} after {:?}",
                    self.config.receipt_timeout
                );
                if let Some(e) = last_error {
                    msg.push_str(&format!(": last error: {e}"))
                }
                return Err(Error::NetworkUnavailable(msg));
            }
            sleep(self.config.poll_interval).await
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use alloy::primitives::{Address, U256};
    use hotel_cid::decode_to_parts;
    use hotel_types::{BookingRequest, GasPlan, Registration, TxStatus, ValidationError};

    use super::{Submitter, SubmitterConfig};
    use crate::{
        api::{ContractCall, ContractError},
        error::Error,
        testing::{MockContract, Recorded},
    };

    fn config() -> SubmitterConfig {
        SubmitterConfig::builder()
            .receipt_timeout(Duration::from_secs(5))
            .poll_interval(Duration::from_millis(100))
            .build()
    }

    #[tokio::test(start_paused = true)]
    async fn booking_confirmed() {
        let mock = Arc::new(MockContract::new().with_pending_polls(2));
        let sub = Submitter::new(mock.clone(), config());
        let req = BookingRequest::parse("Grand Hotel", "1", "3").unwrap();
        let plan = GasPlan::from_estimate(21_000).unwrap();
        let caller = Address::repeat_byte(1);

        let outcome = sub
            .submit_booking(&req, plan, U256::from(300).into(), caller)
            .await
            .unwrap();
        assert_eq!(outcome.status, TxStatus::Success);
        assert!(!outcome.hash.is_zero());

        let calls = mock.calls();
        assert!(matches!(&calls[0], Recorded::Send { call: ContractCall::BookHotel(r), from, value, gas_limit }
            if *r == req && *from == caller && *value == U256::from(300) && *gas_limit == 121_000));
        let polls = calls
            .iter()
            .filter(|c| matches!(c, Recorded::Receipt(_)))
            .count();
        assert_eq!(polls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn reverted_is_not_rejected() {
        let mock = Arc::new(MockContract::new().with_receipt_status(false));
        let sub = Submitter::new(mock, config());
        let reg = Registration::parse("Grand Hotel", "100").unwrap();
        let plan = GasPlan::from_estimate(50_000).unwrap();
        match sub.submit_registration(&reg, plan, Address::ZERO).await {
            Err(Error::TransactionReverted(o)) => assert_eq!(o.status, TxStatus::Failure),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_before_mining() {
        let mock = Arc::new(
            MockContract::new().fail_send(ContractError::Node("insufficient funds".into())),
        );
        let sub = Submitter::new(mock.clone(), config());
        let reg = Registration::parse("Grand Hotel", "100").unwrap();
        let plan = GasPlan::from_estimate(50_000).unwrap();
        let err = sub
            .submit_registration(&reg, plan, Address::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SubmissionRejected(ContractError::Node(_))));
        assert!(mock.calls().iter().all(|c| !matches!(c, Recorded::Receipt(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn node_unreachable_on_send() {
        let mock = Arc::new(
            MockContract::new().fail_send(ContractError::Transport("connection refused".into())),
        );
        let sub = Submitter::new(mock, config());
        let reg = Registration::parse("Grand Hotel", "100").unwrap();
        let plan = GasPlan::from_estimate(50_000).unwrap();
        let err = sub
            .submit_registration(&reg, plan, Address::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NetworkUnavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn receipt_timeout() {
        let mock = Arc::new(MockContract::new().with_pending_polls(usize::MAX));
        let sub = Submitter::new(mock, config());
        let reg = Registration::parse("Grand Hotel", "100").unwrap();
        let plan = GasPlan::from_estimate(50_000).unwrap();
        let err = sub
            .submit_registration(&reg, plan, Address::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NetworkUnavailable(m) if m.contains("no receipt")));
    }

    #[tokio::test(start_paused = true)]
    async fn undecodable_receipt() {
        let mock = Arc::new(
            MockContract::new().fail_receipt(ContractError::Abi("could not decode receipt".into())),
        );
        let sub = Submitter::new(mock.clone(), config());
        let reg = Registration::parse("Grand Hotel", "100").unwrap();
        let plan = GasPlan::from_estimate(50_000).unwrap();
        let err = sub
            .submit_registration(&reg, plan, Address::ZERO)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("decode receipt"));
        assert!(matches!(err, Error::QueryFailed { source: ContractError::Abi(_), .. }));
        let polls = mock
            .calls()
            .iter()
            .filter(|c| matches!(c, Recorded::Receipt(_)))
            .count();
        assert_eq!(polls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_names_last_receipt_error() {
        let mock = Arc::new(
            MockContract::new().fail_receipt(ContractError::Transport("connection reset".into())),
        );
        let sub = Submitter::new(mock, config());
        let reg = Registration::parse("Grand Hotel", "100").unwrap();
        let plan = GasPlan::from_estimate(50_000).unwrap();
        let err = sub
            .submit_registration(&reg, plan, Address::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(&err, Error::NetworkUnavailable(m)
            if m.contains("no receipt") && m.contains("last error: connection reset")));
    }

    #[tokio::test(start_paused = true)]
    async fn attach_needs_32_byte_digest() {
        let mock = Arc::new(MockContract::new());
        let sub = Submitter::new(mock.clone(), config());
        let parts = decode_to_parts("9yRzenUe").unwrap();
        let plan = GasPlan::from_estimate(50_000).unwrap();
        let err = sub
            .attach_content_hash(&"Grand Hotel".parse().unwrap(), &parts, plan, Address::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::DigestLength(4))
        ));
        assert!(mock.calls().is_empty());
    }
}
