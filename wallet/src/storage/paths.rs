use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{WalletError, WalletResult};

/// Filesystem layout of the persisted store.
#[derive(Debug, Clone)]
pub struct StorePaths {
    /// Root directory for store data.
    root_dir: PathBuf,
    /// Persisted store configuration.
    config_file: PathBuf,
    /// Last wallet state snapshot, used to rehydrate on start.
    state_file: PathBuf,
}

impl StorePaths {
    pub const CONFIG_FILENAME: &'static str = "wallet-store.config";
    pub const STATE_FILENAME: &'static str = "wallet-store.state";

    pub fn new(root: impl AsRef<Path>) -> WalletResult<Self> {
        let root_dir = root.as_ref().to_path_buf();
        if root_dir.as_os_str().is_empty() {
            return Err(WalletError::StorageError(
                "Store root directory cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            config_file: root_dir.join(Self::CONFIG_FILENAME),
            state_file: root_dir.join(Self::STATE_FILENAME),
            root_dir,
        })
    }

    pub fn ensure_directories(&self) -> WalletResult<()> {
        fs::create_dir_all(&self.root_dir)?;
        Ok(())
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn files_live_under_root() {
        let temp = TempDir::new().unwrap();
        let paths = StorePaths::new(temp.path().join("store")).unwrap();
        paths.ensure_directories().unwrap();
        assert!(paths.root_dir().is_dir());
        assert!(paths.config_file().starts_with(paths.root_dir()));
        assert!(paths.state_file().starts_with(paths.root_dir()));
    }

    #[test]
    fn empty_root_rejected() {
        assert!(matches!(
            StorePaths::new(""),
            Err(WalletError::StorageError(_))
        ));
    }
}
