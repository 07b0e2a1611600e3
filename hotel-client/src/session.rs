use std::{fmt, sync::Arc};

use alloy::primitives::{Address, U256};
use bytes::Bytes;
use futures::TryStreamExt;
use hotel_cid::ContentIdentifier;
use hotel_contract::{ContractCall, Estimator, HotelContract, Submitter, SubmitterConfig};
use hotel_store::FileStore;
use hotel_types::{
    Booking, BookingRequest, HotelName, PriceEstimate, Registration, SubmissionState,
    TransactionOutcome,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::error::Error;

/// A user-initiated action that changes contract state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Register,
    Book,
    AttachContentHash,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register => f.write_str("register"),
            Self::Book => f.write_str("book"),
            Self::AttachContentHash => f.write_str("attach-content-hash"),
        }
    }
}

/// Emitted whenever a submission moves to another state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub action: Action,
    pub state: SubmissionState,
}

/// Everything an action needs: the signing account, the contract and the
/// file store.
///
/// Created once at startup. Nothing in here changes afterwards, so actions
/// may run concurrently against the same session.
#[derive(Debug)]
pub struct Session<C: ?Sized, S: ?Sized> {
    account: Address,
    contract: Arc<C>,
    store: Arc<S>,
    estimator: Estimator<C>,
    submitter: Submitter<C>,
    progress: Option<UnboundedSender<Progress>>,
}

impl<C, S> Session<C, S>
where
    C: HotelContract + ?Sized,
    S: FileStore + ?Sized,
{
    pub fn new(contract: Arc<C>, store: Arc<S>, account: Address) -> Self {
        Self {
            account,
            estimator: Estimator::new(contract.clone()),
            submitter: Submitter::new(contract.clone(), SubmitterConfig::default()),
            contract,
            store,
            progress: None,
        }
    }

    pub fn with_submitter_config(mut self, cfg: SubmitterConfig) -> Self {
        self.submitter = Submitter::new(self.contract.clone(), cfg);
        self
    }

    /// Report state changes of every submission to `tx`.
    pub fn with_progress(mut self, tx: UnboundedSender<Progress>) -> Self {
        self.progress = Some(tx);
        self
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub async fn owner(&self) -> Result<Address, Error> {
        self.contract
            .owner()
            .await
            .map_err(|e| hotel_contract::Error::query("owner", e).into())
    }

    /// Balance of the session account.
    pub async fn balance(&self) -> Result<U256, Error> {
        self.contract
            .balance(self.account)
            .await
            .map_err(|e| hotel_contract::Error::query("balance", e).into())
    }

    pub async fn estimate_price(
        &self,
        name: &str,
        room_type: &str,
        booking_days: &str,
    ) -> Result<PriceEstimate, Error> {
        let req = BookingRequest::parse(name, room_type, booking_days)?;
        Ok(self.estimator.estimate_price(&req).await?)
    }

    pub async fn book_hotel(
        &self,
        name: &str,
        room_type: &str,
        booking_days: &str,
    ) -> Result<TransactionOutcome, Error> {
        let req = BookingRequest::parse(name, room_type, booking_days)?;
        self.book(&req).await
    }

    /// Estimate the price, plan gas with that price attached, then pay it.
    pub async fn book(&self, req: &BookingRequest) -> Result<TransactionOutcome, Error> {
        let mut t = self.tracker(Action::Book);
        t.advance(SubmissionState::Estimating);
        let price = t.check(self.estimator.estimate_price(req).await)?;
        let call = ContractCall::BookHotel(req.clone());
        self.submit(&mut t, &call, price.amount()).await
    }

    pub async fn hotel_bookings(&self, name: &str) -> Result<Vec<Booking>, Error> {
        let name = HotelName::try_from(name)?;
        self.contract
            .hotel_bookings(&name)
            .await
            .map_err(|e| hotel_contract::Error::query("getHotelBookings", e).into())
    }

    pub async fn register_hotel(&self, name: &str, price: &str) -> Result<TransactionOutcome, Error> {
        let reg = Registration::parse(name, price)?;
        self.register(&reg).await
    }

    pub async fn register(&self, reg: &Registration) -> Result<TransactionOutcome, Error> {
        let mut t = self.tracker(Action::Register);
        let call = ContractCall::RegisterHotel(reg.clone());
        self.submit(&mut t, &call, U256::ZERO).await
    }

    pub async fn upload(&self, data: Bytes) -> Result<ContentIdentifier, Error> {
        let len = data.len();
        let cid = self.store.add(data).await?;
        info!(%cid, %len, "uploaded file");
        Ok(cid)
    }

    /// Upload `data` and store its identifier for hotel `name`.
    pub async fn upload_and_attach(
        &self,
        name: &str,
        data: Bytes,
    ) -> Result<(ContentIdentifier, TransactionOutcome), Error> {
        let name = HotelName::try_from(name)?;
        let cid = self.upload(data).await?;
        let outcome = self.attach(name, &cid).await?;
        Ok((cid, outcome))
    }

    pub async fn attach_content_hash(
        &self,
        name: &str,
        cid: &str,
    ) -> Result<TransactionOutcome, Error> {
        let name = HotelName::try_from(name)?;
        let cid = cid.parse::<ContentIdentifier>()?;
        self.attach(name, &cid).await
    }

    async fn attach(
        &self,
        name: HotelName,
        cid: &ContentIdentifier,
    ) -> Result<TransactionOutcome, Error> {
        let parts = cid.to_parts()?;
        let call = ContractCall::set_ipfs_hash(name, &parts)?;
        let mut t = self.tracker(Action::AttachContentHash);
        self.submit(&mut t, &call, U256::ZERO).await
    }

    /// The identifier stored for hotel `name`, if any.
    pub async fn ipfs_hash(&self, name: &str) -> Result<Option<ContentIdentifier>, Error> {
        let name = HotelName::try_from(name)?;
        let s = self
            .contract
            .ipfs_hash(&name)
            .await
            .map_err(|e| hotel_contract::Error::query("getIPFShash", e))?;
        if s.is_empty() {
            return Ok(None);
        }
        Ok(Some(s.parse()?))
    }

    /// Fetch the content of `cid`. The chunk stream is consumed once.
    pub async fn download(&self, cid: &str) -> Result<Vec<u8>, Error> {
        let cid = cid.parse::<ContentIdentifier>()?;
        let data = self
            .store
            .cat(&cid)
            .await?
            .try_fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await?;
        info!(%cid, len = %data.len(), "downloaded file");
        Ok(data)
    }

    async fn submit(
        &self,
        t: &mut Tracker,
        call: &ContractCall,
        value: U256,
    ) -> Result<TransactionOutcome, Error> {
        t.advance(SubmissionState::Planning);
        let plan = t.check(self.estimator.plan(call, value, self.account).await)?;
        t.advance(SubmissionState::Submitting);
        let hash = t.check(self.submitter.send(call, value, plan, self.account).await)?;
        t.advance(SubmissionState::Pending);
        t.check(self.submitter.wait(call, hash).await)
    }

    fn tracker(&self, action: Action) -> Tracker {
        Tracker {
            action,
            state: SubmissionState::Idle,
            progress: self.progress.clone(),
        }
    }
}

struct Tracker {
    action: Action,
    state: SubmissionState,
    progress: Option<UnboundedSender<Progress>>,
}

impl Tracker {
    fn advance(&mut self, next: SubmissionState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "{} -> {next}",
            self.state
        );
        debug!(action = %self.action, from = %self.state, to = %next, "submission state");
        self.state = next;
        if let Some(tx) = &self.progress {
            let _ = tx.send(Progress {
                action: self.action,
                state: next,
            });
        }
    }

    /// Move to the terminal state matching `r`, if `r` ends the submission.
    fn check<T>(&mut self, r: Result<T, hotel_contract::Error>) -> Result<T, Error> {
        let pending = self.state == SubmissionState::Pending;
        match &r {
            Ok(_) if pending => self.advance(SubmissionState::Confirmed),
            Ok(_) => {}
            Err(hotel_contract::Error::TransactionReverted(_)) if pending => {
                self.advance(SubmissionState::Reverted)
            }
            // No receipt yet: the transaction may still be mined.
            Err(_) if pending => {}
            // The node may have accepted the transaction before the connection failed.
            Err(hotel_contract::Error::NetworkUnavailable(_))
                if self.state == SubmissionState::Submitting => {}
            Err(_) => self.advance(SubmissionState::Rejected),
        }
        r.map_err(Error::from)
    }
}
