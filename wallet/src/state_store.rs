use std::path::Path;

use crate::errors::WalletResult;
use crate::state::WalletState;
use crate::storage::{ChecksummedFile, StorePaths};
use crate::wallet::Wallet;

const STATE_VERSION: u16 = 1;

/// Persists [`WalletState`] snapshots so a restarted store can resume.
#[derive(Debug, Clone)]
pub struct StateStore {
    file: ChecksummedFile<WalletState>,
}

impl StateStore {
    pub fn from_paths(paths: &StorePaths) -> Self {
        Self::new(paths.state_file())
    }

    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: ChecksummedFile::new(path, STATE_VERSION),
        }
    }

    /// Last snapshot, or the initial state when nothing was saved.
    /// Queue and connection phases are transient and never restored.
    /// Keys are not part of the snapshot, so a private-key login comes
    /// back logged out.
    pub fn load(&self) -> WalletResult<WalletState> {
        let Some(mut state) = self.file.load()? else {
            return Ok(WalletState::default());
        };

        if state.wallet == Wallet::PrivateKey {
            log::info!("Stored private-key session dropped, key is not persisted");
            state = state.logged_out();
        }
        state.queue_status = Default::default();
        state.wallet_connect_status = Default::default();
        Ok(state)
    }

    pub fn save(&self, state: &WalletState) -> WalletResult<()> {
        self.file.save(state)
    }

    pub fn clear(&self) -> WalletResult<()> {
        self.file.remove()
    }
}
