use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use blake3::Hasher as Blake3;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{WalletError, WalletResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Envelope<T> {
    version: u16,
    checksum: [u8; 32],
    payload: T,
    modified_at_unix: i64,
}

/// A JSON file holding one `T` inside a versioned, checksummed envelope.
/// Each write goes to its own uniquely named sibling temp file, which is
/// then renamed over the target, so concurrent writers never share one.
#[derive(Debug, Clone)]
pub struct ChecksummedFile<T> {
    path: PathBuf,
    version: u16,
    _payload: PhantomData<fn() -> T>,
}

impl<T> ChecksummedFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl AsRef<Path>, version: u16) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            version,
            _payload: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file does not exist yet.
    pub fn load(&self) -> WalletResult<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path)?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        if envelope.version != self.version {
            return Err(WalletError::ValidationError(format!(
                "Unsupported {} version {}",
                self.describe(),
                envelope.version
            )));
        }

        if checksum(&envelope.payload)? != envelope.checksum {
            return Err(WalletError::ValidationError(format!(
                "{} integrity verification failed",
                self.describe()
            )));
        }

        Ok(Some(envelope.payload))
    }

    pub fn save(&self, payload: &T) -> WalletResult<()> {
        let envelope = Envelope {
            version: self.version,
            checksum: checksum(payload)?,
            modified_at_unix: Utc::now().timestamp(),
            payload,
        };

        let serialized = serde_json::to_vec_pretty(&envelope)?;
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(&serialized)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| WalletError::from(e.error))?;
        Ok(())
    }

    pub fn remove(&self) -> WalletResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store file".to_string())
    }
}

fn checksum<T: Serialize>(payload: &T) -> WalletResult<[u8; 32]> {
    let encoded = serde_json::to_vec(payload)?;
    let mut hasher = Blake3::new();
    hasher.update(&encoded);
    Ok(*hasher.finalize().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    fn sample() -> Sample {
        Sample {
            name: "sample".to_string(),
            count: 3,
        }
    }

    #[test]
    fn missing_file_loads_as_none() {
        let temp = TempDir::new().unwrap();
        let file = ChecksummedFile::<Sample>::new(temp.path().join("absent"), 1);
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn saved_payload_loads_back() {
        let temp = TempDir::new().unwrap();
        let file = ChecksummedFile::new(temp.path().join("sample.json"), 1);
        file.save(&sample()).unwrap();
        assert_eq!(file.load().unwrap(), Some(sample()));

        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("sample.json")]);
    }

    #[test]
    fn concurrent_saves_all_succeed() {
        let temp = TempDir::new().unwrap();
        let file = ChecksummedFile::new(temp.path().join("sample.json"), 1);

        std::thread::scope(|scope| {
            for worker in 0..8u32 {
                let file = &file;
                scope.spawn(move || {
                    for round in 0..50u32 {
                        let payload = Sample {
                            name: format!("worker-{}", worker),
                            count: round,
                        };
                        file.save(&payload).unwrap();
                    }
                });
            }
        });

        let loaded = file.load().unwrap().unwrap();
        assert!(loaded.name.starts_with("worker-"));
        assert_eq!(loaded.count, 49);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn tampered_payload_detected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sample.json");
        let file = ChecksummedFile::new(&path, 1);
        file.save(&sample()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        fs::write(&path, text.replace("\"count\": 3", "\"count\": 4")).unwrap();

        let result = file.load();
        assert!(matches!(result, Err(WalletError::ValidationError(_))));
    }

    #[test]
    fn version_mismatch_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sample.json");
        ChecksummedFile::new(&path, 1).save(&sample()).unwrap();

        let result = ChecksummedFile::<Sample>::new(&path, 2).load();
        assert!(matches!(result, Err(WalletError::ValidationError(msg)) if msg.contains("version")));
    }
}
