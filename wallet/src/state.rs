use serde::{Deserialize, Serialize};

use crate::address::get_default_subaccount_id;
use crate::wallet::Wallet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletConnectStatus {
    #[default]
    Idle,
    Connecting,
    Connected,
    Disconnecting,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    #[default]
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantDirection {
    Granter,
    #[default]
    Grantee,
}

/// Delegation the connected account acts under. Empty strings mean none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthZ {
    pub address: String,
    pub direction: GrantDirection,
    pub injective_address: String,
    pub default_subaccount_id: String,
}

impl AuthZ {
    pub fn cleared(direction: GrantDirection) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }
}

/// Ephemeral key granted broadcast rights until `expiration` (unix seconds).
/// The key is not serialized, so a deserialized session is disabled.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSign {
    #[serde(skip)]
    pub private_key: String,
    pub injective_address: String,
    pub expiration: i64,
    pub duration: i64,
}

impl AutoSign {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expiration <= now
    }
}

impl std::fmt::Debug for AutoSign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSign")
            .field("injective_address", &self.injective_address)
            .field("expiration", &self.expiration)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletState {
    pub wallet_connect_status: WalletConnectStatus,
    pub address: String,
    pub injective_address: String,
    pub address_confirmation: String,
    pub session: String,
    pub addresses: Vec<String>,
    pub hw_addresses: Vec<String>,
    pub wallet: Wallet,
    pub queue_status: QueueStatus,
    pub is_dev: bool,
    pub authz: AuthZ,
    pub auto_sign: Option<AutoSign>,
    /// Held in memory only, never part of a snapshot.
    #[serde(skip)]
    pub private_key: String,

    pub bitget_installed: bool,
    pub phantom_installed: bool,
    pub metamask_installed: bool,
    pub okx_wallet_installed: bool,
    pub trust_wallet_installed: bool,
}

impl Default for WalletState {
    fn default() -> Self {
        Self {
            wallet_connect_status: WalletConnectStatus::Idle,
            address: String::new(),
            injective_address: String::new(),
            address_confirmation: String::new(),
            session: String::new(),
            addresses: Vec::new(),
            hw_addresses: Vec::new(),
            wallet: Wallet::Metamask,
            queue_status: QueueStatus::Idle,
            is_dev: false,
            authz: AuthZ::default(),
            auto_sign: Some(AutoSign::default()),
            private_key: String::new(),
            bitget_installed: false,
            phantom_installed: false,
            metamask_installed: false,
            okx_wallet_installed: false,
            trust_wallet_installed: false,
        }
    }
}

impl WalletState {
    /// Fresh state for a logged-out user. Only the installed-extension
    /// checks survive.
    pub fn logged_out(&self) -> Self {
        Self {
            wallet_connect_status: WalletConnectStatus::Disconnected,
            authz: AuthZ::cleared(GrantDirection::Granter),
            auto_sign: None,
            queue_status: QueueStatus::Idle,
            bitget_installed: self.bitget_installed,
            phantom_installed: self.phantom_installed,
            metamask_installed: self.metamask_installed,
            okx_wallet_installed: self.okx_wallet_installed,
            trust_wallet_installed: self.trust_wallet_installed,
            ..Self::default()
        }
    }

    fn has_confirmed_address(&self) -> bool {
        !self.addresses.is_empty()
            && !self.address.is_empty()
            && !self.address_confirmation.is_empty()
            && !self.injective_address.is_empty()
    }

    pub fn is_user_connected(&self) -> bool {
        self.wallet_connect_status != WalletConnectStatus::Connecting
            && self.has_confirmed_address()
            && !self.session.is_empty()
    }

    pub fn is_wallet_exempt_from_gas_fee(&self, is_devnet: bool) -> bool {
        !self.wallet.is_cosmos() && !is_devnet
    }

    pub fn default_subaccount_id(&self) -> Option<String> {
        if self.injective_address.is_empty() {
            return None;
        }

        get_default_subaccount_id(&self.injective_address).ok()
    }

    pub fn is_authz_wallet_connected(&self) -> bool {
        self.has_confirmed_address()
            && !self.authz.address.is_empty()
            && !self.authz.injective_address.is_empty()
    }

    pub fn authz_or_injective_address(&self) -> &str {
        if self.authz.injective_address.is_empty() {
            &self.injective_address
        } else {
            &self.authz.injective_address
        }
    }

    pub fn authz_or_address(&self) -> &str {
        if self.authz.address.is_empty() {
            &self.address
        } else {
            &self.authz.address
        }
    }

    pub fn authz_or_default_subaccount_id(&self) -> String {
        if !self.authz.default_subaccount_id.is_empty() {
            return self.authz.default_subaccount_id.clone();
        }

        self.default_subaccount_id().unwrap_or_default()
    }

    pub fn is_auto_sign_enabled(&self) -> bool {
        match &self.auto_sign {
            Some(auto_sign) => {
                !auto_sign.injective_address.is_empty()
                    && !auto_sign.private_key.is_empty()
                    && auto_sign.expiration != 0
                    && auto_sign.duration != 0
            }
            None => false,
        }
    }

    /// The auto-sign session, only when it is usable.
    pub fn enabled_auto_sign(&self) -> Option<&AutoSign> {
        if self.is_auto_sign_enabled() {
            self.auto_sign.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::address::get_injective_address;

    const HEX: &str = "0xaf79152ac5df276d9a8e1e2e22822f9713474902";

    fn inj() -> String {
        get_injective_address(HEX).unwrap()
    }

    fn connected() -> WalletState {
        WalletState {
            wallet_connect_status: WalletConnectStatus::Connected,
            address: HEX.to_string(),
            injective_address: inj(),
            address_confirmation: "confirmation".to_string(),
            session: "session".to_string(),
            addresses: vec![HEX.to_string()],
            ..WalletState::default()
        }
    }

    #[test]
    fn initial_state_is_disconnected_with_empty_auto_sign() {
        let state = WalletState::default();
        assert_eq!(state.wallet, Wallet::Metamask);
        assert!(!state.is_user_connected());
        assert!(state.auto_sign.is_some());
        assert!(!state.is_auto_sign_enabled());
        assert_eq!(state.authz.direction, GrantDirection::Grantee);
        assert_eq!(state.default_subaccount_id(), None);
    }

    #[test]
    fn connecting_status_hides_connection() {
        let mut state = connected();
        assert!(state.is_user_connected());
        state.wallet_connect_status = WalletConnectStatus::Connecting;
        assert!(!state.is_user_connected());
    }

    #[test]
    fn authz_getters_prefer_delegation() {
        let mut state = connected();
        assert!(!state.is_authz_wallet_connected());
        assert_eq!(state.authz_or_injective_address(), inj());
        assert_eq!(
            state.authz_or_default_subaccount_id(),
            format!("{}{}", HEX, "0".repeat(24))
        );

        state.authz = AuthZ {
            address: "0xgranter".to_string(),
            direction: GrantDirection::Granter,
            injective_address: "inj1granter".to_string(),
            default_subaccount_id: "0xgranter-sub".to_string(),
        };
        assert!(state.is_authz_wallet_connected());
        assert_eq!(state.authz_or_injective_address(), "inj1granter");
        assert_eq!(state.authz_or_address(), "0xgranter");
        assert_eq!(state.authz_or_default_subaccount_id(), "0xgranter-sub");
    }

    #[test]
    fn auto_sign_needs_every_field() {
        let mut state = connected();
        state.auto_sign = Some(AutoSign {
            private_key: "0xkey".to_string(),
            injective_address: "inj1auto".to_string(),
            expiration: 10,
            duration: 0,
        });
        assert!(!state.is_auto_sign_enabled());
        if let Some(auto_sign) = state.auto_sign.as_mut() {
            auto_sign.duration = 10;
        }
        assert!(state.is_auto_sign_enabled());
        assert!(state.enabled_auto_sign().is_some());
    }

    #[test]
    fn gas_exemption_excludes_cosmos_wallets_and_devnet() {
        let mut state = connected();
        assert!(state.is_wallet_exempt_from_gas_fee(false));
        assert!(!state.is_wallet_exempt_from_gas_fee(true));
        state.wallet = Wallet::Keplr;
        assert!(!state.is_wallet_exempt_from_gas_fee(false));
    }

    #[test]
    fn logged_out_keeps_only_install_flags() {
        let mut state = connected();
        state.metamask_installed = true;
        state.phantom_installed = true;
        state.is_dev = true;
        state.private_key = "0xkey".to_string();

        let reset = state.logged_out();
        assert_eq!(reset.wallet_connect_status, WalletConnectStatus::Disconnected);
        assert!(reset.address.is_empty());
        assert!(reset.session.is_empty());
        assert!(reset.private_key.is_empty());
        assert!(reset.auto_sign.is_none());
        assert!(!reset.is_dev);
        assert!(reset.metamask_installed && reset.phantom_installed);
        assert!(!reset.okx_wallet_installed);
    }
}
