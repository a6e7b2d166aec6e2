/// Account address handling for the trading chain
///
/// Every account has one 20-byte identity with two string forms: the
/// Ethereum-style `0x` hex form used by EVM wallets and the bech32 `inj`
/// form used by Cosmos wallets and the chain itself.
use crate::errors::{WalletError, WalletResult};
use bech32::Hrp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const BECH32_HRP: &str = "inj";
pub const ADDRESS_LENGTH: usize = 20;

/// Number of hex characters appended to the 0x address to form the
/// default (index 0) subaccount id.
const DEFAULT_SUBACCOUNT_SUFFIX_LEN: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    raw_bytes: [u8; ADDRESS_LENGTH],
}

impl Address {
    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        if bytes.len() != ADDRESS_LENGTH {
            return Err(WalletError::InvalidAddress(format!(
                "Invalid address length: expected {} bytes, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            )));
        }

        let mut raw_bytes = [0u8; ADDRESS_LENGTH];
        raw_bytes.copy_from_slice(bytes);
        Ok(Address { raw_bytes })
    }

    /// Parse an address from either the `0x` or the bech32 form.
    pub fn from_string(address: &str) -> WalletResult<Self> {
        if address.starts_with("0x") || address.starts_with("0X") {
            Self::from_hex(address)
        } else if address.starts_with(BECH32_HRP) {
            Self::from_bech32(address)
        } else {
            Err(WalletError::InvalidAddress(format!(
                "Address must start with '0x' or '{}'",
                BECH32_HRP
            )))
        }
    }

    fn from_hex(hex_address: &str) -> WalletResult<Self> {
        if hex_address.len() != 2 + ADDRESS_LENGTH * 2 {
            return Err(WalletError::InvalidAddress(format!(
                "Invalid hex address length: expected 42 characters, got {}",
                hex_address.len()
            )));
        }

        let bytes = hex::decode(&hex_address[2..])
            .map_err(|_| WalletError::InvalidAddress("Invalid hex in address".to_string()))?;
        Self::from_bytes(&bytes)
    }

    fn from_bech32(bech32_address: &str) -> WalletResult<Self> {
        let (hrp, data) = bech32::decode(bech32_address)
            .map_err(|e| WalletError::InvalidAddress(format!("Invalid Bech32: {}", e)))?;

        if hrp != bech32_hrp()? {
            return Err(WalletError::InvalidAddress(format!(
                "Invalid Bech32 HRP (must be '{}')",
                BECH32_HRP
            )));
        }

        Self::from_bytes(&data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    /// Lowercase `0x` form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.raw_bytes))
    }

    pub fn to_bech32(&self) -> WalletResult<String> {
        bech32::encode::<bech32::Bech32>(bech32_hrp()?, &self.raw_bytes)
            .map_err(|e| WalletError::InvalidAddress(format!("Bech32 encoding failed: {}", e)))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_string(s)
    }
}

fn bech32_hrp() -> WalletResult<Hrp> {
    Hrp::parse(BECH32_HRP).map_err(|e| WalletError::InvalidAddress(format!("Invalid HRP: {}", e)))
}

/// Convert a bech32 address to its `0x` form. `0x` input is returned as is.
pub fn get_ethereum_address(address: &str) -> WalletResult<String> {
    if address.starts_with("0x") {
        return Ok(address.to_string());
    }

    Ok(Address::from_bech32(address)?.to_hex())
}

/// Convert a `0x` address to its bech32 form. Bech32 input is returned as is.
pub fn get_injective_address(address: &str) -> WalletResult<String> {
    if address.starts_with(BECH32_HRP) {
        return Ok(address.to_string());
    }

    Address::from_hex(address)?.to_bech32()
}

/// The subaccount with nonce 0 owned by `address`.
pub fn get_default_subaccount_id(address: &str) -> WalletResult<String> {
    let ethereum_address = get_ethereum_address(address)?;
    Ok(format!(
        "{}{}",
        ethereum_address,
        "0".repeat(DEFAULT_SUBACCOUNT_SUFFIX_LEN)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "0xaf79152ac5df276d9a8e1e2e22822f9713474902";

    #[test]
    fn hex_and_bech32_describe_the_same_account() {
        let injective = get_injective_address(HEX).unwrap();
        assert!(injective.starts_with("inj1"));
        assert_eq!(get_ethereum_address(&injective).unwrap(), HEX);
    }

    #[test]
    fn conversions_pass_through_matching_forms() {
        assert_eq!(get_ethereum_address(HEX).unwrap(), HEX);
        let injective = get_injective_address(HEX).unwrap();
        assert_eq!(get_injective_address(&injective).unwrap(), injective);
    }

    #[test]
    fn default_subaccount_is_address_plus_zero_nonce() {
        let injective = get_injective_address(HEX).unwrap();
        let subaccount = get_default_subaccount_id(&injective).unwrap();
        assert_eq!(subaccount.len(), 66);
        assert!(subaccount.starts_with(HEX));
        assert!(subaccount.ends_with(&"0".repeat(24)));
    }

    #[test]
    fn rejects_foreign_prefixes() {
        assert!(matches!(
            Address::from_string("cosmos1abc"),
            Err(WalletError::InvalidAddress(_))
        ));
        assert!(matches!(
            Address::from_string("0x1234"),
            Err(WalletError::InvalidAddress(_))
        ));
    }
}
