/// Ephemeral key handling for auto-sign sessions and raw private-key logins
///
/// Only key generation and address derivation live here; signing and
/// transaction assembly belong to the wallet SDK behind `strategy`.
use crate::address::Address;
use crate::errors::{WalletError, WalletResult};
use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

const PRIVATE_KEY_BYTES: usize = 32;

/// A secp256k1 private key. The scalar is zeroized when the key drops.
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Parse a hex private key, with or without a `0x` prefix.
    pub fn from_hex(private_key: &str) -> WalletResult<Self> {
        let trimmed = private_key.trim();
        let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = Zeroizing::new(
            hex::decode(stripped)
                .map_err(|e| WalletError::InvalidKey(format!("Invalid hex: {}", e)))?,
        );

        if bytes.len() != PRIVATE_KEY_BYTES {
            return Err(WalletError::InvalidKey(format!(
                "Invalid private key length: expected {} bytes, got {}",
                PRIVATE_KEY_BYTES,
                bytes.len()
            )));
        }

        let signing_key = SigningKey::from_slice(&bytes)
            .map_err(|e| WalletError::InvalidKey(format!("Invalid secp256k1 scalar: {}", e)))?;
        Ok(Self { signing_key })
    }

    /// `0x`-prefixed lowercase hex of the scalar.
    pub fn to_private_key_hex(&self) -> Zeroizing<String> {
        let bytes = Zeroizing::new(self.signing_key.to_bytes());
        Zeroizing::new(format!("0x{}", hex::encode(bytes.as_slice())))
    }

    /// Keccak-256 of the uncompressed public key, last 20 bytes.
    pub fn to_address(&self) -> WalletResult<Address> {
        let encoded = self.signing_key.verifying_key().to_encoded_point(false);
        let public_key = encoded.as_bytes();
        if public_key.len() != 65 {
            return Err(WalletError::CryptoError(
                "Unexpected uncompressed public key length".to_string(),
            ));
        }

        let digest = Keccak256::digest(&public_key[1..]);
        Address::from_bytes(&digest[12..])
    }

    pub fn to_bech32(&self) -> WalletResult<String> {
        self.to_address()?.to_bech32()
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey").finish_non_exhaustive()
    }
}
