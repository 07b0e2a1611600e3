use std::sync::Arc;

use alloy::primitives::{Address, U256};
use hotel_types::{BookingRequest, GasPlan, PriceEstimate};
use tracing::{info, warn};

use crate::{
    api::{ContractCall, HotelContract},
    error::{Error, Stage},
};

/// Queries the contract for prices and gas before anything is submitted.
#[derive(Debug)]
pub struct Estimator<C: ?Sized> {
    contract: Arc<C>,
}

impl<C: ?Sized> Clone for Estimator<C> {
    fn clone(&self) -> Self {
        Self {
            contract: self.contract.clone(),
        }
    }
}

impl<C: HotelContract + ?Sized> Estimator<C> {
    pub fn new(contract: Arc<C>) -> Self {
        Self { contract }
    }

    /// Read-only price query for a booking.
    pub async fn estimate_price(&self, req: &BookingRequest) -> Result<PriceEstimate, Error> {
        match self.contract.estimate_booking_price(req).await {
            Ok(p) => {
                info!(hotel = %req.hotel_name(), room = %req.room_type(), days = %req.booking_days(), price = %p, "estimated booking price");
                Ok(p.into())
            }
            Err(err) => {
                warn!(hotel = %req.hotel_name(), %err, "price estimation failed");
                Err(Error::EstimationFailed {
                    stage: Stage::Price,
                    source: err,
                })
            }
        }
    }

    /// Gas plan for booking `req` with `price` attached.
    pub async fn plan_gas(
        &self,
        req: &BookingRequest,
        price: PriceEstimate,
        caller: Address,
    ) -> Result<GasPlan, Error> {
        let call = ContractCall::BookHotel(req.clone());
        self.plan(&call, price.amount(), caller).await
    }

    /// Gas plan for an arbitrary state-changing call.
    pub async fn plan(
        &self,
        call: &ContractCall,
        value: U256,
        caller: Address,
    ) -> Result<GasPlan, Error> {
        let gas = match self.contract.estimate_gas(call, caller, value).await {
            Ok(g) => g,
            Err(err) => {
                warn!(method = %call.method(), %err, "gas estimation failed");
                return Err(Error::EstimationFailed {
                    stage: Stage::Gas,
                    source: err,
                });
            }
        };
        let plan = GasPlan::from_estimate(gas).ok_or(Error::GasLimitOverflow(gas))?;
        info!(
            method    = %call.method(),
            estimated = %plan.estimated_gas(),
            limit     = %plan.gas_limit(),
            "planned gas"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy::primitives::{Address, U256};
    use hotel_types::{BookingRequest, GAS_SAFETY_MARGIN};

    use super::Estimator;
    use crate::{
        api::ContractError,
        error::{Error, Stage},
        testing::{MockContract, Recorded},
    };

    fn request() -> BookingRequest {
        BookingRequest::parse("Grand Hotel", "1", "3").unwrap()
    }

    #[tokio::test]
    async fn price_then_gas() {
        let mock = Arc::new(MockContract::new().with_price(300).with_gas(21_000));
        let est = Estimator::new(mock.clone());
        let caller = Address::repeat_byte(7);

        let price = est.estimate_price(&request()).await.unwrap();
        assert_eq!(price.amount(), U256::from(300));

        let plan = est.plan_gas(&request(), price, caller).await.unwrap();
        assert_eq!(plan.estimated_gas(), 21_000);
        assert_eq!(plan.gas_limit(), 121_000);

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[1], Recorded::EstimateGas { from, value, .. }
            if *from == caller && *value == U256::from(300)));
    }

    #[tokio::test]
    async fn failed_price_query() {
        let mock = Arc::new(
            MockContract::new().fail_price(ContractError::Node("execution reverted".into())),
        );
        let est = Estimator::new(mock);
        let err = est.estimate_price(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::EstimationFailed {
                stage: Stage::Price,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn failed_gas_query() {
        let mock = Arc::new(
            MockContract::new()
                .with_price(300)
                .fail_gas(ContractError::Transport("connection refused".into())),
        );
        let est = Estimator::new(mock);
        let err = est
            .plan_gas(&request(), U256::from(300).into(), Address::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::EstimationFailed {
                stage: Stage::Gas,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn gas_overflow() {
        let mock = Arc::new(MockContract::new().with_gas(u64::MAX - GAS_SAFETY_MARGIN + 1));
        let est = Estimator::new(mock);
        let err = est
            .plan_gas(&request(), U256::ZERO.into(), Address::ZERO)
            .await
            .unwrap_err();
        assert!(err.is_estimation_failure());
    }
}
