use serde::{Deserialize, Serialize};
use std::fmt;

/// Wallet kinds the strategy can drive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Wallet {
    #[default]
    Metamask,
    TrustWallet,
    OkxWallet,
    BitGet,
    Phantom,
    WalletConnect,
    Keplr,
    Leap,
    Ninji,
    #[serde(rename = "owallet")]
    OWallet,
    Cosmostation,
    Ledger,
    LedgerLegacy,
    LedgerCosmos,
    Trezor,
    Magic,
    PrivateKey,
}

impl Wallet {
    /// Browser extensions whose injected provider can be detected.
    pub const INJECTED_EVM: [Wallet; 5] = [
        Wallet::BitGet,
        Wallet::Phantom,
        Wallet::Metamask,
        Wallet::OkxWallet,
        Wallet::TrustWallet,
    ];

    pub const COSMOS_EXTENSIONS: [Wallet; 5] = [
        Wallet::Leap,
        Wallet::Ninji,
        Wallet::Keplr,
        Wallet::OWallet,
        Wallet::Cosmostation,
    ];

    /// Wallets whose native accounts are `0x` addresses.
    pub fn is_evm(&self) -> bool {
        matches!(
            self,
            Wallet::Metamask
                | Wallet::TrustWallet
                | Wallet::OkxWallet
                | Wallet::BitGet
                | Wallet::Phantom
                | Wallet::WalletConnect
                | Wallet::Ledger
                | Wallet::LedgerLegacy
                | Wallet::Trezor
                | Wallet::Magic
                | Wallet::PrivateKey
        )
    }

    /// Wallets whose native accounts are bech32 addresses.
    pub fn is_cosmos(&self) -> bool {
        matches!(
            self,
            Wallet::Keplr
                | Wallet::Leap
                | Wallet::Ninji
                | Wallet::OWallet
                | Wallet::Cosmostation
                | Wallet::LedgerCosmos
        )
    }

    pub fn is_hardware(&self) -> bool {
        matches!(
            self,
            Wallet::Ledger | Wallet::LedgerLegacy | Wallet::LedgerCosmos | Wallet::Trezor
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Wallet::Metamask => "metamask",
            Wallet::TrustWallet => "trust-wallet",
            Wallet::OkxWallet => "okx-wallet",
            Wallet::BitGet => "bit-get",
            Wallet::Phantom => "phantom",
            Wallet::WalletConnect => "wallet-connect",
            Wallet::Keplr => "keplr",
            Wallet::Leap => "leap",
            Wallet::Ninji => "ninji",
            Wallet::OWallet => "owallet",
            Wallet::Cosmostation => "cosmostation",
            Wallet::Ledger => "ledger",
            Wallet::LedgerLegacy => "ledger-legacy",
            Wallet::LedgerCosmos => "ledger-cosmos",
            Wallet::Trezor => "trezor",
            Wallet::Magic => "magic",
            Wallet::PrivateKey => "private-key",
        }
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Login providers offered by the embedded (magic-link) wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MagicProvider {
    Email,
    Google,
    Apple,
    Discord,
    Github,
    Twitter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_groups_match_classification() {
        assert!(Wallet::INJECTED_EVM.iter().all(Wallet::is_evm));
        assert!(Wallet::COSMOS_EXTENSIONS.iter().all(Wallet::is_cosmos));
    }

    #[test]
    fn no_wallet_is_both_evm_and_cosmos() {
        let all = [
            Wallet::Metamask,
            Wallet::TrustWallet,
            Wallet::OkxWallet,
            Wallet::BitGet,
            Wallet::Phantom,
            Wallet::WalletConnect,
            Wallet::Keplr,
            Wallet::Leap,
            Wallet::Ninji,
            Wallet::OWallet,
            Wallet::Cosmostation,
            Wallet::Ledger,
            Wallet::LedgerLegacy,
            Wallet::LedgerCosmos,
            Wallet::Trezor,
            Wallet::Magic,
            Wallet::PrivateKey,
        ];
        for wallet in all {
            assert!(!(wallet.is_evm() && wallet.is_cosmos()), "{}", wallet);
        }
    }

    #[test]
    fn serializes_with_kebab_names() {
        let json = serde_json::to_string(&Wallet::OkxWallet).unwrap();
        assert_eq!(json, "\"okx-wallet\"");
        let json = serde_json::to_string(&Wallet::OWallet).unwrap();
        assert_eq!(json, "\"owallet\"");
    }

    #[test]
    fn default_wallet_is_metamask() {
        assert_eq!(Wallet::default(), Wallet::Metamask);
    }
}
