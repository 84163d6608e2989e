//! Concurrent in-memory attempt store with optional JSON snapshots.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::guard::record::AttemptRecord;
use crate::guard::subject::SubjectId;
use crate::store::{AttemptStore, StoreError};

/// Process-local store. `update` runs under the key's shard write lock, which
/// makes read-increment-lock a single step for concurrent callers.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<SubjectId, AttemptRecord>>,
    persistence_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
        }
    }

    /// Load a snapshot if one exists; later flushes write back to `path`.
    pub fn load_from_file(path: &Path) -> Result<Self, StoreError> {
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let map: HashMap<String, AttemptRecord> = serde_json::from_reader(reader)?;

            for (raw, record) in map {
                match SubjectId::parse(&raw) {
                    Ok(subject) => {
                        store.inner.insert(subject, record);
                    }
                    Err(e) => {
                        tracing::warn!(
                            subject = %raw,
                            error = %e,
                            "Skipping invalid subject in snapshot"
                        );
                    }
                }
            }
            tracing::info!(
                path = %path.display(),
                records = store.inner.len(),
                "Loaded attempt records from snapshot"
            );
        }
        Ok(store)
    }

    /// Write a snapshot to the persistence path, replacing the old one.
    pub fn save_to_file(&self) -> Result<(), StoreError> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };

        let map: HashMap<String, AttemptRecord> = self
            .inner
            .iter()
            .map(|r| (r.key().to_string(), *r.value()))
            .collect();

        let tmp = path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, &map)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;

        tracing::debug!(path = %path.display(), records = map.len(), "Saved attempt snapshot");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl AttemptStore for MemoryStore {
    fn get(&self, subject: &SubjectId) -> Result<Option<AttemptRecord>, StoreError> {
        Ok(self.inner.get(subject).map(|r| *r.value()))
    }

    fn update(
        &self,
        subject: &SubjectId,
        f: &mut dyn FnMut(Option<AttemptRecord>) -> Option<AttemptRecord>,
    ) -> Result<Option<AttemptRecord>, StoreError> {
        let result = match self.inner.entry(subject.clone()) {
            Entry::Occupied(mut occupied) => match f(Some(*occupied.get())) {
                Some(next) => {
                    *occupied.get_mut() = next;
                    Some(next)
                }
                None => {
                    occupied.remove();
                    None
                }
            },
            Entry::Vacant(vacant) => match f(None) {
                Some(next) => {
                    vacant.insert(next);
                    Some(next)
                }
                None => None,
            },
        };
        Ok(result)
    }

    fn set(&self, subject: &SubjectId, record: AttemptRecord) -> Result<(), StoreError> {
        self.inner.insert(subject.clone(), record);
        Ok(())
    }

    fn delete(&self, subject: &SubjectId) -> Result<bool, StoreError> {
        Ok(self.inner.remove(subject).is_some())
    }

    fn retain(
        &self,
        keep: &mut dyn FnMut(&SubjectId, &AttemptRecord) -> bool,
    ) -> Result<usize, StoreError> {
        let mut removed = 0;
        self.inner.retain(|subject, record| {
            let kept = keep(subject, record);
            if !kept {
                removed += 1;
            }
            kept
        });
        Ok(removed)
    }

    fn snapshot(&self) -> Result<Vec<(SubjectId, AttemptRecord)>, StoreError> {
        Ok(self
            .inner
            .iter()
            .map(|r| (r.key().clone(), *r.value()))
            .collect())
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.save_to_file()
    }
}
