//! Helper functions to build Ethereum [providers](https://docs.rs/alloy/latest/alloy/providers/trait.Provider.html)

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder, WalletProvider},
    signers::local::{LocalSignerError, MnemonicBuilder, PrivateKeySigner, coins_bip39::English},
    transports::TransportError,
};
use tracing::info;
use url::Url;

/// Build a local signer from wallet mnemonic and account index
pub fn build_signer(
    mnemonic: String,
    account_index: u32,
) -> Result<PrivateKeySigner, LocalSignerError> {
    MnemonicBuilder::<English>::default()
        .phrase(mnemonic)
        .index(account_index)?
        .build()
}

/// A provider that signs locally with the given wallet, together with the
/// address of the signing account.
pub fn wallet_provider(
    mnemonic: String,
    account_index: u32,
    url: Url,
) -> Result<(DynProvider, Address), LocalSignerError> {
    let signer = build_signer(mnemonic, account_index)?;
    let wallet = EthereumWallet::from(signer);
    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);
    let account = provider.default_signer_address();
    info!(%account, "using local wallet");
    Ok((provider.erased(), account))
}

/// A provider that leaves signing to the node, using the first account the
/// node manages (`eth_accounts[0]`).
///
/// Returns `Ok(None)` if the node manages no accounts.
pub async fn node_account_provider(
    url: Url,
) -> Result<Option<(DynProvider, Address)>, TransportError> {
    let provider = ProviderBuilder::new().connect_http(url);
    let Some(account) = provider.get_accounts().await?.into_iter().next() else {
        return Ok(None);
    };
    info!(%account, "using node managed account");
    Ok(Some((provider.erased(), account)))
}
