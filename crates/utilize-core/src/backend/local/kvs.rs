//! Process-local key-value stores

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utilize_config::io;

use super::seco::SeCo;
use crate::backend::{BackendError, BackendResult, KeyValueStore};

/// On-disk layout of a file-backed store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct KvsFile {
    entries: Vec<(String, Vec<u8>)>,
}

#[derive(Debug, Default)]
struct State {
    /// Values as encoded by the store's `SeCo`
    entries: IndexMap<String, Vec<u8>>,
    closed: bool,
}

/// Key-value store kept in memory, optionally persisted to one file.
///
/// The file holds a MessagePack `KvsFile` and is rewritten atomically
/// after every `set`.
#[derive(Debug)]
pub struct LocalKvs {
    state: Mutex<State>,
    seco: Arc<SeCo>,
    path: Option<PathBuf>,
}

impl LocalKvs {
    pub fn memory(seco: Arc<SeCo>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            seco,
            path: None,
        }
    }

    /// Open the file-backed store at `path`, loading existing entries.
    pub fn open(path: &Path, seco: Arc<SeCo>) -> BackendResult<Self> {
        let mut state = State::default();
        if path.exists() {
            let bytes = io::read_bytes(path)?;
            let file: KvsFile =
                rmp_serde::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))?;
            state.entries = file.entries.into_iter().collect();
        }
        tracing::debug!(path = %path.display(), entries = state.entries.len(), "opened kvs file");

        Ok(Self {
            state: Mutex::new(state),
            seco,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn persist(&self, state: &State) -> BackendResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = KvsFile {
            entries: state
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        };
        let bytes = rmp_serde::to_vec(&file).map_err(|e| BackendError::Encode(e.to_string()))?;
        io::write_atomic(path, &bytes)?;
        Ok(())
    }
}

impl KeyValueStore for LocalKvs {
    fn set(&self, key: &str, value: &Value) -> BackendResult<()> {
        let encoded = self.seco.dumps(value)?;
        let mut state = self.state.lock();
        if state.closed {
            return Err(BackendError::Closed);
        }
        state.entries.insert(key.to_string(), encoded);
        self.persist(&state)
    }

    fn get(&self, key: &str) -> BackendResult<Option<Value>> {
        let state = self.state.lock();
        if state.closed {
            return Err(BackendError::Closed);
        }
        state
            .entries
            .get(key)
            .map(|bytes| self.seco.loads(bytes))
            .transpose()
    }

    fn close(&self) -> BackendResult<()> {
        let mut state = self.state.lock();
        if !state.closed {
            state.closed = true;
            state.entries.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::SecoParams;
    use serde_json::json;
    use tempfile::TempDir;

    fn seco() -> Arc<SeCo> {
        Arc::new(SeCo::new(&SecoParams::default()).unwrap())
    }

    #[test]
    fn test_memory_store_sets_and_gets() {
        let kvs = LocalKvs::memory(seco());

        kvs.set("a", &json!({"n": 1})).unwrap();
        kvs.set("a", &json!("replaced")).unwrap();

        assert_eq!(kvs.get("a").unwrap(), Some(json!("replaced")));
        assert_eq!(kvs.get("missing").unwrap(), None);
        assert_eq!(kvs.len(), 1);
        assert!(kvs.path().is_none());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data/database.kvs");

        let kvs = LocalKvs::open(&path, seco()).unwrap();
        kvs.set("greeting", &json!("hello")).unwrap();
        kvs.set("count", &json!(2)).unwrap();
        kvs.close().unwrap();

        let reopened = LocalKvs::open(&path, seco()).unwrap();
        assert_eq!(reopened.get("greeting").unwrap(), Some(json!("hello")));
        assert_eq!(reopened.get("count").unwrap(), Some(json!(2)));
    }

    #[test]
    fn test_closed_store_refuses_access() {
        let kvs = LocalKvs::memory(seco());
        kvs.set("k", &json!(true)).unwrap();
        kvs.close().unwrap();

        assert!(kvs.is_closed());
        assert!(matches!(kvs.get("k"), Err(BackendError::Closed)));
        assert!(matches!(kvs.set("k", &json!(1)), Err(BackendError::Closed)));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("database.kvs");
        std::fs::write(&path, b"\xc1\xc1").unwrap();

        assert!(matches!(
            LocalKvs::open(&path, seco()),
            Err(BackendError::Decode(_))
        ));
    }
}
