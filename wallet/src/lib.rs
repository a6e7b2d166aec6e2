// lib.rs - Core library structure for the trading wallet store

pub mod address;
pub mod config_store;
pub mod crypto;
pub mod errors;
pub mod events;
pub mod msgs;
pub mod network;
pub mod session;
pub mod state;
pub mod state_store;
pub mod storage;
pub mod store;
pub mod strategy;
pub mod summary;
pub mod validation;
pub mod wallet;

// Re-export common types
pub use address::{get_default_subaccount_id, get_ethereum_address, get_injective_address, Address};
pub use config_store::{AutoSignConfig, ConfigStore, NetworkConfig, StoreConfig};
pub use crypto::PrivateKey;
pub use errors::{WalletError, WalletResult};
pub use events::{EventBus, WalletEvent};
pub use msgs::{msgs_or_msg_exec_msgs, ContractExecutionCompatAuthz, Msg};
pub use network::network_from_address;
pub use session::{Clock, ManualClock, SystemClock};
pub use state::{AuthZ, AutoSign, GrantDirection, QueueStatus, WalletConnectStatus, WalletState};
pub use state_store::StateStore;
pub use storage::StorePaths;
pub use store::{SharedWalletStore, WalletSdk, WalletStore};
pub use strategy::{
    BroadcastOptions, GetAddressesOptions, MsgBroadcaster, StrategyOptions, TxResponse,
    WalletStrategy,
};
pub use summary::{format_notification_description, get_human_readable_message, Message};
pub use validation::InputValidator;
pub use wallet::{MagicProvider, Wallet};
