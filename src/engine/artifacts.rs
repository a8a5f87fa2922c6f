// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! JSON persistence of node output bags, keyed by `(run id, node name)`.
//!
//! One record per executed node lives at `<dir>/<run_id>_<node>.json`.
//! Records are self-describing JSON and round-trip losslessly, which is what
//! makes cache hits equivalent to re-running the node. The store directory
//! is created lazily; creating an already-existing directory is not an
//! error.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::ArtifactError;

/// Write-once-per-run-per-node artifact store backed by a directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The record location for a `(run id, node)` pair.
    pub fn record_path(&self, run_id: &str, node: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.json", run_id, node))
    }

    /// Persist a node's output bag, returning the record path.
    ///
    /// Re-executing a node overwrites its prior record for the same run.
    pub fn save(
        &self,
        run_id: &str,
        node: &str,
        data: &HashMap<String, Value>,
    ) -> Result<PathBuf, ArtifactError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.record_path(run_id, node);
        let encoded = serde_json::to_string_pretty(data)?;
        fs::write(&path, encoded)?;
        Ok(path)
    }

    /// Load a prior record, or `None` if no record exists.
    ///
    /// A missing record is a cache miss, not an error; a present but
    /// undecodable record is an error.
    pub fn load(
        &self,
        run_id: &str,
        node: &str,
    ) -> Result<Option<HashMap<String, Value>>, ArtifactError> {
        let path = self.record_path(run_id, node);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let data: HashMap<String, Value> = serde_json::from_str(&content)?;
        Ok(Some(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("artifacts"));

        let mut bag = HashMap::new();
        bag.insert(
            "gathered_data".to_string(),
            json!({"items": [{"headline": "News", "nested": {"deep": [1, 2, 3]}}]}),
        );
        bag.insert("count".to_string(), json!(2));

        let path = store.save("run1", "gather", &bag).unwrap();
        assert_eq!(path, dir.path().join("artifacts").join("run1_gather.json"));

        let loaded = store.load("run1", "gather").unwrap().unwrap();
        assert_eq!(loaded, bag);
    }

    #[test]
    fn missing_record_is_none_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(store.load("run1", "gather").unwrap().is_none());
    }

    #[test]
    fn corrupt_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        fs::write(store.record_path("run1", "gather"), "not json").unwrap();

        assert!(matches!(
            store.load("run1", "gather"),
            Err(ArtifactError::Decode(_))
        ));
    }

    #[test]
    fn store_directory_is_created_lazily_and_idempotently() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = ArtifactStore::new(&nested);
        assert!(!nested.exists());

        let bag = HashMap::new();
        store.save("run1", "n", &bag).unwrap();
        store.save("run1", "n", &bag).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn records_are_keyed_by_run_and_node() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let mut first = HashMap::new();
        first.insert("v".to_string(), json!(1));
        let mut second = HashMap::new();
        second.insert("v".to_string(), json!(2));

        store.save("run1", "n", &first).unwrap();
        store.save("run2", "n", &second).unwrap();

        assert_eq!(store.load("run1", "n").unwrap().unwrap(), first);
        assert_eq!(store.load("run2", "n").unwrap().unwrap(), second);
    }
}
