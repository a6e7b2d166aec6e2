/// Seams to the external wallet SDK
///
/// The store never signs or broadcasts on its own. It sequences calls on a
/// [`WalletStrategy`] (which wallet, which addresses, which session) and a
/// [`MsgBroadcaster`] (sign and submit).
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::WalletResult;
use crate::msgs::Msg;
use crate::wallet::{MagicProvider, Wallet};

/// Options the strategy keeps between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyOptions {
    pub private_key: Option<String>,
}

/// Extra inputs for address discovery. Only the embedded wallet reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetAddressesOptions {
    pub email: Option<String>,
    pub provider: Option<MagicProvider>,
}

#[async_trait]
pub trait WalletStrategy: Send + Sync {
    async fn set_wallet(&self, wallet: Wallet) -> WalletResult<()>;

    fn set_options(&self, options: StrategyOptions);

    async fn disconnect(&self) -> WalletResult<()>;

    async fn get_addresses(&self, options: GetAddressesOptions) -> WalletResult<Vec<String>>;

    /// Returns the current session, prompting the wallet to confirm
    /// ownership of `address` when one is given.
    async fn get_session_or_confirm(&self, address: Option<&str>) -> WalletResult<String>;

    async fn confirm_cosmos_wallet_address(
        &self,
        wallet: Wallet,
        injective_address: &str,
    ) -> WalletResult<()>;

    async fn validate_evm_wallet(&self, wallet: Wallet, address: &str) -> WalletResult<()>;

    async fn validate_cosmos_wallet(
        &self,
        wallet: Wallet,
        injective_address: &str,
    ) -> WalletResult<()>;

    /// Whether the browser exposes an injected provider for `wallet`.
    async fn has_evm_provider(&self, wallet: Wallet) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastOptions {
    pub msgs: Vec<Msg>,
    pub injective_address: String,
    #[serde(default)]
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResponse {
    pub tx_hash: String,
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
}

#[async_trait]
pub trait MsgBroadcaster: Send + Sync {
    async fn broadcast(&self, options: BroadcastOptions) -> WalletResult<TxResponse>;

    /// Direct-sign path used by the auto-sign key.
    async fn broadcast_v2(&self, options: BroadcastOptions) -> WalletResult<TxResponse>;

    /// Gas is paid by the fee-delegation service rather than the signer.
    async fn broadcast_with_fee_delegation(
        &self,
        options: BroadcastOptions,
    ) -> WalletResult<TxResponse>;
}
