//! Atomic JSON documents on local disk.

use crate::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A typed JSON document at a fixed path.
///
/// Writes go to a sibling temp file which is then renamed over the target, so
/// readers see either the old or the new document. Concurrent writers are
/// last-writer-wins.
#[derive(Debug, Clone)]
pub struct JsonFile<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document; a missing file reads as `T::default()`.
    pub fn load(&self) -> Result<T> {
        match std::fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                Error::persistence(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the document.
    pub fn save(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_vec_pretty(value)?;
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AlertState;
    use crate::signal::Signal;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let file: JsonFile<AlertState> = JsonFile::new(dir.path().join("absent.json"));
        assert_eq!(file.load().unwrap(), AlertState::default());
    }

    #[test]
    fn test_save_creates_parent_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("a").join("b").join("state.json"));

        let first = AlertState {
            last_signal: Some(Signal::Buy),
            last_notified_at_ms: 10,
            snoozed_until_ms: 0,
        };
        file.save(&first).unwrap();

        let second = AlertState {
            last_signal: Some(Signal::Sell),
            ..first
        };
        file.save(&second).unwrap();

        assert_eq!(file.load().unwrap(), second);
        assert!(!file.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let file: JsonFile<AlertState> = JsonFile::new(path);
        assert!(matches!(file.load(), Err(Error::Persistence(_))));
    }
}
