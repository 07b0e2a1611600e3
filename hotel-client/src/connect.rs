use std::sync::Arc;

use alloy::{
    primitives::Address,
    providers::{DynProvider, Provider},
    signers::local::LocalSignerError,
    transports::TransportError,
};
use hotel_config::{ArtifactError, ClientConfig};
use hotel_contract::{
    HotelBookingClient, SubmitterConfig,
    provider::{node_account_provider, wallet_provider},
};
use tracing::info;

use crate::session::Session;

pub type HotelSession = Session<HotelBookingClient<DynProvider>, hotel_store::Client>;

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("network unavailable: {0}")]
    NetworkUnavailable(#[from] TransportError),

    #[error("invalid wallet: {0}")]
    Wallet(#[from] LocalSignerError),

    #[error("no wallet configured and the node manages no accounts")]
    NoAccount,

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("neither a contract address nor an artifact is configured")]
    MissingContract,

    #[error("no contract deployed at {0}")]
    NoContract(Address),

    #[error("file store: {0}")]
    Store(#[from] hotel_store::Error),
}

/// Connect to the chain and the file store described by `cfg`.
pub async fn connect(cfg: &ClientConfig) -> Result<HotelSession, ConnectError> {
    let url = cfg.chain.rpc_url.clone();
    let (provider, account) = match &cfg.wallet {
        Some(w) => wallet_provider(w.mnemonic.clone(), w.account_index, url)?,
        None => node_account_provider(url)
            .await?
            .ok_or(ConnectError::NoAccount)?,
    };

    let address = match (cfg.chain.contract, &cfg.chain.artifact) {
        (Some(a), _) => a,
        (None, Some(path)) => {
            let network = provider.get_net_version().await?;
            hotel_config::contract_address(path, network).await?
        }
        (None, None) => return Err(ConnectError::MissingContract),
    };
    if provider.get_code_at(address).await?.is_empty() {
        return Err(ConnectError::NoContract(address));
    }
    info!(rpc = %cfg.chain.rpc_url, contract = %address, %account, "connected");

    let store = hotel_store::Config::builder()
        .base_url(cfg.ipfs.base_url.clone())
        .build();
    let store = hotel_store::Client::new(store)?;

    let submit = SubmitterConfig::builder()
        .receipt_timeout(cfg.submit.receipt_timeout())
        .poll_interval(cfg.submit.poll_interval())
        .build();

    let contract = HotelBookingClient::new(provider, address);
    Ok(Session::new(Arc::new(contract), Arc::new(store), account).with_submitter_config(submit))
}
