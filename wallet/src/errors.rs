use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletError {
    // Policy violations raised by the store itself
    General(String),
    NotConnected,

    // Failures reported by the wallet SDK
    Strategy(String),

    // Cryptographic errors
    CryptoError(String),
    InvalidKey(String),

    // Storage errors
    StorageError(String),
    FileNotFound(String),
    PermissionDenied(String),

    // Validation errors
    ValidationError(String),
    InvalidAddress(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WalletError::General(msg) => write!(f, "{}", msg),
            WalletError::NotConnected => write!(f, "Wallet not connected"),

            WalletError::Strategy(msg) => write!(f, "Wallet strategy error: {}", msg),

            WalletError::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            WalletError::InvalidKey(msg) => write!(f, "Invalid key: {}", msg),

            WalletError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            WalletError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            WalletError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),

            WalletError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            WalletError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
        }
    }
}

impl std::error::Error for WalletError {}

pub type WalletResult<T> = Result<T, WalletError>;

/// Shorthand for the store's generic policy error.
#[macro_export]
macro_rules! general_error {
    ($msg:expr) => {
        $crate::errors::WalletError::General($msg.to_string())
    };
}

impl From<std::io::Error> for WalletError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => WalletError::FileNotFound(error.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                WalletError::PermissionDenied(error.to_string())
            }
            _ => WalletError::StorageError(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(error: serde_json::Error) -> Self {
        WalletError::ValidationError(format!("JSON error: {}", error))
    }
}
