use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use secrecy::{ExposeSecret, SecretString};

use crate::address::{get_default_subaccount_id, get_ethereum_address, get_injective_address};
use crate::config_store::{environment_from_env, ConfigStore, StoreConfig};
use crate::crypto::PrivateKey;
use crate::errors::{WalletError, WalletResult};
use crate::events::{EventBus, WalletEvent};
use crate::general_error;
use crate::msgs::{msgs_or_msg_exec_msgs, ContractExecutionCompatAuthz, Msg};
use crate::session::{Clock, GrantScope, PendingAutoSign, SystemClock};
use crate::state::{
    AuthZ, AutoSign, GrantDirection, QueueStatus, WalletConnectStatus, WalletState,
};
use crate::state_store::StateStore;
use crate::storage::StorePaths;
use crate::strategy::{
    BroadcastOptions, GetAddressesOptions, MsgBroadcaster, StrategyOptions, TxResponse,
    WalletStrategy,
};
use crate::validation::InputValidator;
use crate::wallet::{MagicProvider, Wallet};

/// The SDK objects the store drives. The auto-sign pair is configured with
/// the ephemeral key and never touches the user's wallet.
#[derive(Clone)]
pub struct WalletSdk {
    pub strategy: Arc<dyn WalletStrategy>,
    pub broadcaster: Arc<dyn MsgBroadcaster>,
    pub auto_sign_strategy: Arc<dyn WalletStrategy>,
    pub auto_sign_broadcaster: Arc<dyn MsgBroadcaster>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BroadcastMode {
    Standard,
    FeeDelegated,
}

/// Wallet connection state plus the actions that move it.
///
/// State is only ever replaced under the write lock after an awaited SDK
/// call has resolved; no lock is held across an `.await`. `persist_lock` is
/// taken before the state lock so snapshots reach disk in mutation order.
pub struct WalletStore {
    state: RwLock<WalletState>,
    persist_lock: Mutex<()>,
    sdk: WalletSdk,
    config: StoreConfig,
    events: EventBus,
    clock: Arc<dyn Clock>,
    validator: InputValidator,
    state_store: Option<StateStore>,
}

impl WalletStore {
    pub fn new(sdk: WalletSdk, config: StoreConfig) -> WalletResult<Self> {
        config.validate()?;
        Ok(Self {
            state: RwLock::new(WalletState::default()),
            persist_lock: Mutex::new(()),
            sdk,
            config,
            events: EventBus::new(),
            clock: Arc::new(SystemClock),
            validator: InputValidator::new()?,
            state_store: None,
        })
    }

    /// Open the store rooted at `root_dir`, loading configuration and the
    /// last state snapshot. Every later state change is written back.
    pub fn initialize(root_dir: impl AsRef<Path>, sdk: WalletSdk) -> WalletResult<Self> {
        let paths = StorePaths::new(root_dir)?;
        paths.ensure_directories()?;

        let config = ConfigStore::from_paths(&paths).load_or_default(environment_from_env())?;
        let state_store = StateStore::from_paths(&paths);
        let state = state_store.load()?;
        log::info!(
            "Wallet store initialized for {} ({})",
            config.environment,
            config.network.chain_id
        );

        Ok(Self::new(sdk, config)?
            .with_state(state)
            .with_state_store(state_store))
    }

    pub fn with_state(self, state: WalletState) -> Self {
        *self.state.write() = state;
        self
    }

    pub fn with_state_store(mut self, state_store: StateStore) -> Self {
        self.state_store = Some(state_store);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> WalletState {
        self.state.read().clone()
    }

    pub fn read<F, T>(&self, op: F) -> T
    where
        F: FnOnce(&WalletState) -> T,
    {
        let guard = self.state.read();
        op(&*guard)
    }

    fn patch<F>(&self, op: F) -> WalletResult<()>
    where
        F: FnOnce(&mut WalletState),
    {
        let _persist = self.persist_lock.lock();
        let snapshot = {
            let mut guard = self.state.write();
            op(&mut *guard);
            self.state_store.as_ref().map(|_| (*guard).clone())
        };

        self.persist(snapshot.as_ref())
    }

    fn persist(&self, snapshot: Option<&WalletState>) -> WalletResult<()> {
        match (&self.state_store, snapshot) {
            (Some(store), Some(snapshot)) => store.save(snapshot),
            _ => Ok(()),
        }
    }

    // ----- getters -----

    pub fn is_user_connected(&self) -> bool {
        self.read(WalletState::is_user_connected)
    }

    pub fn is_wallet_exempt_from_gas_fee(&self) -> bool {
        self.read(|state| state.is_wallet_exempt_from_gas_fee(self.config.network.is_devnet))
    }

    pub fn default_subaccount_id(&self) -> Option<String> {
        self.read(WalletState::default_subaccount_id)
    }

    pub fn is_authz_wallet_connected(&self) -> bool {
        self.read(WalletState::is_authz_wallet_connected)
    }

    pub fn authz_or_injective_address(&self) -> String {
        self.read(|state| state.authz_or_injective_address().to_string())
    }

    pub fn authz_or_default_subaccount_id(&self) -> String {
        self.read(WalletState::authz_or_default_subaccount_id)
    }

    pub fn authz_or_address(&self) -> String {
        self.read(|state| state.authz_or_address().to_string())
    }

    pub fn is_auto_sign_enabled(&self) -> bool {
        self.read(WalletState::is_auto_sign_enabled)
    }

    // ----- lifecycle -----

    /// Restore SDK-side state from a rehydrated store. Keys only exist in
    /// memory, so after a restart there is nothing to hand back to the
    /// strategies and the user signs in again.
    pub async fn init(&self) -> WalletResult<()> {
        self.patch(|state| state.wallet_connect_status = WalletConnectStatus::Idle)?;

        let (wallet, connected, auto_sign_key, private_key) = self.read(|state| {
            (
                state.wallet,
                state.is_user_connected(),
                state.enabled_auto_sign().map(|auto| auto.private_key.clone()),
                state.private_key.clone(),
            )
        });

        self.sdk.strategy.set_wallet(wallet).await?;

        if wallet == Wallet::Magic && !connected {
            self.connect_magic(None, None).await?;
        }

        if let Some(private_key) = auto_sign_key {
            self.sdk.auto_sign_strategy.set_options(StrategyOptions {
                private_key: Some(private_key),
            });
        }

        if !private_key.is_empty() {
            let secret = SecretString::from(private_key);
            self.connect_wallet(Wallet::PrivateKey, Some(&secret)).await?;
        }

        Ok(())
    }

    /// Ask the wallet to confirm it still controls the connected account.
    /// Skipped while an auto-sign session signs on the user's behalf.
    pub async fn validate(&self) -> WalletResult<()> {
        let (wallet, address, injective_address, auto_sign) = self.read(|state| {
            (
                state.wallet,
                state.address.clone(),
                state.injective_address.clone(),
                state.is_auto_sign_enabled(),
            )
        });

        if auto_sign {
            return Ok(());
        }

        if Wallet::INJECTED_EVM.contains(&wallet) {
            self.sdk
                .strategy
                .validate_evm_wallet(wallet, &address)
                .await?;
        }

        if Wallet::COSMOS_EXTENSIONS.contains(&wallet) {
            self.sdk
                .strategy
                .validate_cosmos_wallet(wallet, &injective_address)
                .await?;
        }

        Ok(())
    }

    /// Claim the single broadcast slot. A claim that cannot be persisted is
    /// released again before the error is returned.
    pub fn queue(&self) -> WalletResult<()> {
        let _persist = self.persist_lock.lock();
        let snapshot = {
            let mut state = self.state.write();
            if state.queue_status == QueueStatus::Loading {
                return Err(general_error!("You have a pending transaction."));
            }
            state.queue_status = QueueStatus::Loading;
            self.state_store.as_ref().map(|_| (*state).clone())
        };

        if let Err(err) = self.persist(snapshot.as_ref()) {
            log::warn!("Releasing broadcast slot, snapshot not saved: {}", err);
            self.state.write().queue_status = QueueStatus::Idle;
            return Err(err);
        }
        Ok(())
    }

    /// Release the broadcast slot.
    pub fn dequeue(&self) -> WalletResult<()> {
        self.patch(|state| state.queue_status = QueueStatus::Idle)
    }

    pub async fn validate_and_queue(&self) -> WalletResult<()> {
        self.validate().await?;
        self.queue()
    }

    pub fn on_connect(&self) -> WalletResult<()> {
        self.events.emit(WalletEvent::ModalsClosed);
        self.patch(|state| state.wallet_connect_status = WalletConnectStatus::Connected)?;
        self.events.emit(WalletEvent::WalletConnected);
        Ok(())
    }

    // ----- installed-extension checks -----

    pub async fn check_is_wallet_installed(&self, wallet: Wallet) -> WalletResult<bool> {
        if !Wallet::INJECTED_EVM.contains(&wallet) {
            return Err(WalletError::ValidationError(format!(
                "{} has no injected provider to check",
                wallet
            )));
        }

        let installed = self.sdk.strategy.has_evm_provider(wallet).await;
        self.patch(|state| match wallet {
            Wallet::Metamask => state.metamask_installed = installed,
            Wallet::TrustWallet => state.trust_wallet_installed = installed,
            Wallet::OkxWallet => state.okx_wallet_installed = installed,
            Wallet::BitGet => state.bitget_installed = installed,
            Wallet::Phantom => state.phantom_installed = installed,
            _ => {}
        })?;
        Ok(installed)
    }

    pub async fn check_is_metamask_installed(&self) -> WalletResult<bool> {
        self.check_is_wallet_installed(Wallet::Metamask).await
    }

    pub async fn check_is_trust_wallet_installed(&self) -> WalletResult<bool> {
        self.check_is_wallet_installed(Wallet::TrustWallet).await
    }

    pub async fn check_is_okx_wallet_installed(&self) -> WalletResult<bool> {
        self.check_is_wallet_installed(Wallet::OkxWallet).await
    }

    pub async fn check_is_bitget_installed(&self) -> WalletResult<bool> {
        self.check_is_wallet_installed(Wallet::BitGet).await
    }

    pub async fn check_is_phantom_wallet_installed(&self) -> WalletResult<bool> {
        self.check_is_wallet_installed(Wallet::Phantom).await
    }

    // ----- connection -----

    /// Point the strategy at `wallet`. Cached hardware addresses mean the
    /// device session is still wanted, so no disconnect happens then.
    pub async fn connect_wallet(
        &self,
        wallet: Wallet,
        private_key: Option<&SecretString>,
    ) -> WalletResult<()> {
        let has_hw_addresses = self.read(|state| !state.hw_addresses.is_empty());
        if !has_hw_addresses {
            self.sdk.strategy.disconnect().await?;
        }

        self.sdk.strategy.set_wallet(wallet).await?;

        if let Some(private_key) = private_key {
            self.sdk.strategy.set_options(StrategyOptions {
                private_key: Some(private_key.expose_secret().to_string()),
            });
        }

        log::debug!("Wallet strategy set to {}", wallet);
        self.patch(|state| {
            state.wallet = wallet;
            if wallet != Wallet::PrivateKey {
                state.wallet_connect_status = WalletConnectStatus::Connecting;
            }
        })
    }

    /// Fetch hardware-wallet accounts, as bech32. A different device (or an
    /// empty cache) starts a fresh list, otherwise the next page is appended.
    pub async fn get_hw_addresses(&self, wallet: Wallet) -> WalletResult<Vec<String>> {
        let fresh = self.read(|state| state.hw_addresses.is_empty() || state.wallet != wallet);

        if fresh {
            self.sdk.strategy.disconnect().await?;
            self.sdk.strategy.set_wallet(wallet).await?;
            self.patch(|state| state.wallet = wallet)?;
        }

        let addresses = self
            .sdk
            .strategy
            .get_addresses(GetAddressesOptions::default())
            .await?;
        let injective_addresses = if wallet.is_evm() {
            addresses
                .iter()
                .map(|address| get_injective_address(address))
                .collect::<WalletResult<Vec<_>>>()?
        } else {
            addresses
        };

        self.patch(|state| {
            if fresh {
                state.hw_addresses = injective_addresses;
            } else {
                state.hw_addresses.extend(injective_addresses);
            }
        })?;

        Ok(self.read(|state| state.hw_addresses.clone()))
    }

    async fn connect_evm_extension(&self, wallet: Wallet) -> WalletResult<()> {
        self.connect_wallet(wallet, None).await?;

        let addresses = self
            .sdk
            .strategy
            .get_addresses(GetAddressesOptions::default())
            .await?;
        let address = first_address(&addresses, wallet)?;
        self.validator.validate_ethereum_address(&address)?;
        let session = self
            .sdk
            .strategy
            .get_session_or_confirm(Some(&address))
            .await?;
        let injective_address = get_injective_address(&address)?;
        let address_confirmation = self
            .sdk
            .strategy
            .get_session_or_confirm(Some(&address))
            .await?;

        self.patch(|state| {
            state.addresses = addresses;
            state.address = address;
            state.injective_address = injective_address;
            state.address_confirmation = address_confirmation;
            state.session = session;
        })?;

        log::info!("Connected {}", wallet);
        self.on_connect()
    }

    async fn connect_cosmos_extension(
        &self,
        wallet: Wallet,
        confirm_with_wallet: bool,
    ) -> WalletResult<()> {
        self.connect_wallet(wallet, None).await?;

        let injective_addresses = self
            .sdk
            .strategy
            .get_addresses(GetAddressesOptions::default())
            .await?;
        let injective_address = first_address(&injective_addresses, wallet)?;
        let session = self.sdk.strategy.get_session_or_confirm(None).await?;

        if confirm_with_wallet {
            self.sdk
                .strategy
                .confirm_cosmos_wallet_address(wallet, &injective_address)
                .await?;
        }

        let address = get_ethereum_address(&injective_address)?;
        let address_confirmation = self
            .sdk
            .strategy
            .get_session_or_confirm(Some(&injective_address))
            .await?;

        self.patch(|state| {
            state.injective_address = injective_address;
            state.addresses = injective_addresses;
            state.address = address;
            state.address_confirmation = address_confirmation;
            state.session = session;
        })?;

        log::info!("Connected {}", wallet);
        self.on_connect()
    }

    /// Ledger and Trezor: the account was picked from [`Self::get_hw_addresses`].
    async fn connect_hardware(&self, wallet: Wallet, injective_address: &str) -> WalletResult<()> {
        if !wallet.is_hardware() || wallet == Wallet::LedgerCosmos {
            return Err(WalletError::ValidationError(format!(
                "{} is not an EVM hardware wallet",
                wallet
            )));
        }
        self.validator.validate_injective_address(injective_address)?;

        self.connect_wallet(wallet, None).await?;

        let ethereum_address = get_ethereum_address(injective_address)?;
        let session = self
            .sdk
            .strategy
            .get_session_or_confirm(Some(&ethereum_address))
            .await?;
        let address_confirmation = self
            .sdk
            .strategy
            .get_session_or_confirm(Some(&ethereum_address))
            .await?;

        self.patch(|state| {
            state.address = ethereum_address.clone();
            state.injective_address = injective_address.to_string();
            state.addresses = vec![ethereum_address];
            state.address_confirmation = address_confirmation;
            state.session = session;
        })?;

        log::info!("Connected {}", wallet);
        self.on_connect()
    }

    pub async fn connect_metamask(&self) -> WalletResult<()> {
        self.connect_evm_extension(Wallet::Metamask).await
    }

    pub async fn connect_trust_wallet(&self) -> WalletResult<()> {
        self.connect_evm_extension(Wallet::TrustWallet).await
    }

    pub async fn connect_okx_wallet(&self) -> WalletResult<()> {
        self.connect_evm_extension(Wallet::OkxWallet).await
    }

    pub async fn connect_phantom_wallet(&self) -> WalletResult<()> {
        self.connect_evm_extension(Wallet::Phantom).await
    }

    pub async fn connect_bitget(&self) -> WalletResult<()> {
        self.connect_evm_extension(Wallet::BitGet).await
    }

    pub async fn connect_wallet_connect(&self) -> WalletResult<()> {
        self.connect_evm_extension(Wallet::WalletConnect).await
    }

    pub async fn connect_keplr(&self) -> WalletResult<()> {
        self.connect_cosmos_extension(Wallet::Keplr, true).await
    }

    pub async fn connect_leap(&self) -> WalletResult<()> {
        self.connect_cosmos_extension(Wallet::Leap, false).await
    }

    pub async fn connect_ninji(&self) -> WalletResult<()> {
        self.connect_cosmos_extension(Wallet::Ninji, false).await
    }

    pub async fn connect_owallet(&self) -> WalletResult<()> {
        self.connect_cosmos_extension(Wallet::OWallet, false).await
    }

    pub async fn connect_cosmostation(&self) -> WalletResult<()> {
        self.connect_cosmos_extension(Wallet::Cosmostation, false)
            .await
    }

    /// `wallet` is [`Wallet::Ledger`] or [`Wallet::LedgerLegacy`].
    pub async fn connect_ledger(&self, wallet: Wallet, injective_address: &str) -> WalletResult<()> {
        if wallet == Wallet::Trezor {
            return Err(WalletError::ValidationError(
                "Use connect_trezor for Trezor devices".to_string(),
            ));
        }
        self.connect_hardware(wallet, injective_address).await
    }

    pub async fn connect_trezor(&self, injective_address: &str) -> WalletResult<()> {
        self.connect_hardware(Wallet::Trezor, injective_address)
            .await
    }

    pub async fn connect_ledger_cosmos(&self, injective_address: &str) -> WalletResult<()> {
        self.validator.validate_injective_address(injective_address)?;
        self.connect_wallet(Wallet::LedgerCosmos, None).await?;

        let ethereum_address = get_ethereum_address(injective_address)?;
        let session = self.sdk.strategy.get_session_or_confirm(None).await?;
        let address_confirmation = self
            .sdk
            .strategy
            .get_session_or_confirm(Some(injective_address))
            .await?;

        self.patch(|state| {
            state.injective_address = injective_address.to_string();
            state.address = ethereum_address.clone();
            state.addresses = vec![ethereum_address];
            state.address_confirmation = address_confirmation;
            state.session = session;
        })?;

        log::info!("Connected {}", Wallet::LedgerCosmos);
        self.on_connect()
    }

    /// Embedded wallet login. Failures after the strategy switch put the
    /// store back to its idle default wallet instead of propagating.
    pub async fn connect_magic(
        &self,
        provider: Option<MagicProvider>,
        email: Option<&str>,
    ) -> WalletResult<()> {
        self.connect_wallet(Wallet::Magic, None).await?;

        if let Err(err) = self.complete_magic_login(provider, email).await {
            log::warn!("Magic login failed, resetting wallet: {}", err);
            let initial_wallet = WalletState::default().wallet;
            self.patch(|state| {
                state.wallet = initial_wallet;
                state.wallet_connect_status = WalletConnectStatus::Idle;
            })?;
        }

        Ok(())
    }

    async fn complete_magic_login(
        &self,
        provider: Option<MagicProvider>,
        email: Option<&str>,
    ) -> WalletResult<()> {
        if let Some(email) = email {
            self.validator.validate_email(email)?;
        }

        let addresses = self
            .sdk
            .strategy
            .get_addresses(GetAddressesOptions {
                email: email.map(str::to_string),
                provider,
            })
            .await?;
        let Some(injective_address) = addresses.into_iter().next() else {
            log::debug!("Magic returned no account");
            return Ok(());
        };

        let ethereum_address = get_ethereum_address(&injective_address)?;
        let session = self
            .sdk
            .strategy
            .get_session_or_confirm(Some(&injective_address))
            .await?;
        let address_confirmation = self
            .sdk
            .strategy
            .get_session_or_confirm(Some(&injective_address))
            .await?;

        self.patch(|state| {
            state.address = ethereum_address.clone();
            state.addresses = vec![ethereum_address];
            state.address_confirmation = address_confirmation;
            state.injective_address = injective_address;
            state.session = session;
        })?;

        log::info!("Connected {}", Wallet::Magic);
        self.on_connect()
    }

    /// Watch-only developer login that impersonates `injective_address`.
    pub async fn connect_address(&self, injective_address: &str) -> WalletResult<()> {
        self.validator.validate_injective_address(injective_address)?;
        self.connect_wallet(Wallet::Metamask, None).await?;

        let address = get_ethereum_address(injective_address)?;
        let session = self
            .sdk
            .strategy
            .get_session_or_confirm(Some(&address))
            .await?;
        let address_confirmation = self
            .sdk
            .strategy
            .get_session_or_confirm(Some(&address))
            .await?;

        self.patch(|state| {
            state.address = address.clone();
            state.addresses = vec![address];
            state.injective_address = injective_address.to_string();
            state.address_confirmation = address_confirmation;
            state.session = session;
            state.is_dev = true;
        })?;

        log::info!("Connected developer address {}", injective_address);
        self.on_connect()
    }

    pub async fn connect_private_key(&self, private_key: &SecretString) -> WalletResult<()> {
        self.validator
            .validate_private_key(private_key.expose_secret())?;
        let key = PrivateKey::from_hex(private_key.expose_secret())?;
        let injective_address = key.to_bech32()?;

        self.connect_wallet(Wallet::PrivateKey, Some(private_key))
            .await?;

        let address = get_ethereum_address(&injective_address)?;
        let session = self
            .sdk
            .strategy
            .get_session_or_confirm(Some(&address))
            .await?;
        let address_confirmation = self
            .sdk
            .strategy
            .get_session_or_confirm(Some(&address))
            .await?;
        let stored_key = private_key.expose_secret().to_string();

        self.patch(|state| {
            state.address = address.clone();
            state.session = session;
            state.injective_address = injective_address;
            state.addresses = vec![address];
            state.address_confirmation = address_confirmation;
            state.wallet = Wallet::PrivateKey;
            state.private_key = stored_key;
        })?;

        log::info!("Connected {}", Wallet::PrivateKey);
        self.on_connect()
    }

    // ----- broadcasting -----

    /// Resolve who signs `msgs`. `Ok(None)` when no user is connected.
    pub fn prepare_broadcast_messages(
        &self,
        msgs: &[Msg],
        memo: Option<&str>,
    ) -> WalletResult<Option<BroadcastOptions>> {
        let state = self.state();
        if !state.is_user_connected() {
            return Ok(None);
        }

        if let Some(memo) = memo {
            self.validator.validate_memo(memo)?;
        }

        let authz_connected = state.is_authz_wallet_connected();
        if state.is_auto_sign_enabled() && authz_connected {
            return Err(general_error!("Authz and auto-sign cannot be used together"));
        }

        let msgs = if authz_connected {
            msgs_or_msg_exec_msgs(msgs, &state.injective_address)
        } else {
            msgs.to_vec()
        };

        Ok(Some(BroadcastOptions {
            msgs,
            injective_address: state.injective_address,
            memo: memo.map(str::to_string),
        }))
    }

    pub async fn broadcast_messages(
        &self,
        msgs: &[Msg],
        memo: Option<&str>,
    ) -> WalletResult<Option<TxResponse>> {
        self.dispatch(msgs, memo, BroadcastMode::Standard).await
    }

    pub async fn broadcast_with_fee_delegation(
        &self,
        msgs: &[Msg],
        memo: Option<&str>,
    ) -> WalletResult<Option<TxResponse>> {
        self.dispatch(msgs, memo, BroadcastMode::FeeDelegated).await
    }

    /// Auto-sign session to route through, if any. Contract executions
    /// always go through the user's wallet.
    fn auto_sign_route(&self, msgs: &[Msg]) -> Option<AutoSign> {
        if msgs.iter().any(Msg::is_execute_contract) {
            return None;
        }

        self.read(|state| state.enabled_auto_sign().cloned())
    }

    async fn dispatch(
        &self,
        msgs: &[Msg],
        memo: Option<&str>,
        mode: BroadcastMode,
    ) -> WalletResult<Option<TxResponse>> {
        let Some(options) = self.prepare_broadcast_messages(msgs, memo)? else {
            log::debug!("Broadcast skipped, no connected user");
            return Ok(None);
        };

        if let Some(auto_sign) = self.auto_sign_route(msgs) {
            let auto_sign_options = BroadcastOptions {
                msgs: msgs_or_msg_exec_msgs(msgs, &auto_sign.injective_address),
                injective_address: auto_sign.injective_address,
                memo: options.memo,
            };
            log::info!(
                "Broadcasting {} message(s) through auto-sign ({:?})",
                msgs.len(),
                mode
            );
            let broadcaster = &self.sdk.auto_sign_broadcaster;
            let response = match mode {
                BroadcastMode::Standard => broadcaster.broadcast_v2(auto_sign_options).await?,
                BroadcastMode::FeeDelegated => {
                    broadcaster
                        .broadcast_with_fee_delegation(auto_sign_options)
                        .await?
                }
            };
            return Ok(Some(response));
        }

        log::info!("Broadcasting {} message(s) ({:?})", options.msgs.len(), mode);
        let broadcaster = &self.sdk.broadcaster;
        let response = match mode {
            BroadcastMode::Standard => broadcaster.broadcast(options).await?,
            BroadcastMode::FeeDelegated => broadcaster.broadcast_with_fee_delegation(options).await?,
        };
        Ok(Some(response))
    }

    /// Grants must be signed by the granter, so they never take the
    /// auto-sign route.
    async fn broadcast_grants(&self, grants: &[Msg]) -> WalletResult<TxResponse> {
        let options = self
            .prepare_broadcast_messages(grants, None)?
            .ok_or(WalletError::NotConnected)?;
        self.sdk
            .broadcaster
            .broadcast_with_fee_delegation(options)
            .await
    }

    // ----- AuthZ -----

    /// Act on behalf of `injective_address` from now on.
    pub fn connect_authz(
        &self,
        injective_address: &str,
        direction: GrantDirection,
    ) -> WalletResult<()> {
        self.validator.validate_injective_address(injective_address)?;
        let authz = AuthZ {
            direction,
            injective_address: injective_address.to_string(),
            address: get_ethereum_address(injective_address)?,
            default_subaccount_id: get_default_subaccount_id(injective_address)?,
        };

        log::info!("AuthZ delegation set to {} ({:?})", injective_address, direction);
        self.patch(|state| state.authz = authz)?;
        self.on_connect()
    }

    pub fn reset_authz(&self) -> WalletResult<()> {
        self.patch(|state| state.authz = AuthZ::cleared(GrantDirection::Granter))?;
        self.on_connect()
    }

    // ----- auto-sign -----

    /// Generate an auto-sign key, grant it `msg_types` and `contract_authz`
    /// for the configured window, and start using it.
    pub async fn connect_auto_sign(
        &self,
        msg_types: &[String],
        contract_authz: &[ContractExecutionCompatAuthz],
    ) -> WalletResult<()> {
        let scope = GrantScope::new(msg_types, contract_authz);
        scope.ensure_not_empty()?;

        let granter = self.read(|state| state.injective_address.clone());
        let pending = PendingAutoSign::generate(
            &granter,
            scope,
            self.clock.now_unix(),
            self.config.auto_sign.grant_expiration_secs,
        )?;

        self.broadcast_grants(&pending.grants).await?;

        let auto_sign = pending.auto_sign;
        log::info!(
            "Auto-sign enabled for {} until {}",
            auto_sign.injective_address,
            auto_sign.expiration
        );
        self.sdk.auto_sign_strategy.set_options(StrategyOptions {
            private_key: Some(auto_sign.private_key.clone()),
        });
        self.patch(|state| state.auto_sign = Some(auto_sign))
    }

    /// Re-grant the existing auto-sign key once its grants have expired.
    pub async fn validate_auto_sign(
        &self,
        msg_types: &[String],
        contract_authz: &[ContractExecutionCompatAuthz],
    ) -> WalletResult<()> {
        let scope = GrantScope::new(msg_types, contract_authz);
        scope.ensure_not_empty()?;

        let Some((current, granter, wallet, private_key)) = self.read(|state| {
            state.enabled_auto_sign().map(|auto_sign| {
                (
                    auto_sign.clone(),
                    state.injective_address.clone(),
                    state.wallet,
                    state.private_key.clone(),
                )
            })
        }) else {
            return Ok(());
        };

        let Some(pending) = PendingAutoSign::renew(
            &current,
            &granter,
            scope,
            self.clock.now_unix(),
            self.config.auto_sign.fallback_duration_secs,
        )?
        else {
            return Ok(());
        };

        let secret = (wallet == Wallet::PrivateKey && !private_key.is_empty())
            .then(|| SecretString::from(private_key));
        self.connect_wallet(wallet, secret.as_ref()).await?;
        self.patch(|state| state.wallet_connect_status = WalletConnectStatus::Connected)?;

        self.broadcast_grants(&pending.grants).await?;

        log::info!(
            "Auto-sign renewed for {} until {}",
            pending.auto_sign.injective_address,
            pending.auto_sign.expiration
        );
        self.patch(|state| state.auto_sign = Some(pending.auto_sign))
    }

    pub async fn disconnect_auto_sign(&self) -> WalletResult<()> {
        self.patch(|state| state.auto_sign = None)?;
        log::info!("Auto-sign disconnected");
        self.sdk.auto_sign_strategy.disconnect().await
    }

    pub async fn logout(&self) -> WalletResult<()> {
        self.patch(|state| state.wallet_connect_status = WalletConnectStatus::Disconnecting)?;

        self.sdk.strategy.disconnect().await?;

        self.patch(|state| *state = state.logged_out())?;
        log::info!("Wallet logged out");
        self.events.emit(WalletEvent::WalletDisconnected);
        Ok(())
    }
}

fn first_address(addresses: &[String], wallet: Wallet) -> WalletResult<String> {
    addresses
        .first()
        .cloned()
        .ok_or_else(|| WalletError::Strategy(format!("{} returned no addresses", wallet)))
}

/// Shared store handle for UI components.
#[derive(Clone)]
pub struct SharedWalletStore(pub Arc<WalletStore>);

impl SharedWalletStore {
    pub fn new(inner: WalletStore) -> Self {
        Self(Arc::new(inner))
    }
}

impl Deref for SharedWalletStore {
    type Target = WalletStore;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
