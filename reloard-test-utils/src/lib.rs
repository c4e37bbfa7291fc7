//! RELOARD Test Utilities
//!
//! Centralized test infrastructure for the reloard workspace:
//! - An in-memory mock store with a simulated server side
//! - Mock record handles with observable identity and reload counters
//! - Proptest generators for record keys
//!
//! The mock models the situation the guard exists for: the "server" side
//! is authoritative and versioned, the "cache" side holds handles that can
//! lag behind it, and a record can be deleted on the server while a cached
//! handle still points at it.

// Re-export core types for convenience
pub use reloard_core::{
    RecordId, RecordKey, RecordStore, RouteRecord, StoreError, StoreResult, TypeName,
};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

// ============================================================================
// MOCK RECORD
// ============================================================================

#[derive(Debug)]
struct MockRecordState {
    /// Absent for transient records that were never persisted.
    key: Option<RecordKey>,
    /// Generation of server data this handle has seen. Reload and fetch
    /// sync it to the server side.
    version: u64,
    /// How many times `reload` has succeeded on this handle.
    reloads: u64,
}

/// A record handle backed by [`MockStore`].
///
/// Clones share state, mirroring a host store's identity map: reloading
/// any clone refreshes them all, and [`same_identity`](Self::same_identity)
/// makes that sharing observable in assertions.
#[derive(Debug, Clone)]
pub struct MockRecord {
    state: Arc<RwLock<MockRecordState>>,
    store: Weak<RwLock<MockStoreInner>>,
}

impl MockRecord {
    fn persisted(key: RecordKey, version: u64, store: Weak<RwLock<MockStoreInner>>) -> Self {
        Self {
            state: Arc::new(RwLock::new(MockRecordState {
                key: Some(key),
                version,
                reloads: 0,
            })),
            store,
        }
    }

    /// A locally-constructed record that was never saved to the server.
    /// Has no persisted identifier, and reloading it fails.
    pub fn transient() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockRecordState {
                key: None,
                version: 0,
                reloads: 0,
            })),
            store: Weak::new(),
        }
    }

    /// The key this handle is persisted under, if any.
    pub fn key(&self) -> Option<RecordKey> {
        self.state.read().unwrap().key.clone()
    }

    /// Server-data generation this handle currently reflects.
    pub fn version(&self) -> u64 {
        self.state.read().unwrap().version
    }

    /// Number of successful reloads performed through this record.
    pub fn reload_count(&self) -> u64 {
        self.state.read().unwrap().reloads
    }

    /// Whether two handles refer to the same logical record.
    pub fn same_identity(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

#[async_trait]
impl RouteRecord for MockRecord {
    fn persisted_id(&self) -> Option<RecordId> {
        self.state
            .read()
            .unwrap()
            .key
            .as_ref()
            .map(|key| key.id().clone())
    }

    async fn reload(&self) -> StoreResult<Self> {
        let key = self
            .key()
            .ok_or(StoreError::NeverPersisted)?;
        let store = self.store.upgrade().ok_or_else(|| StoreError::Transport {
            reason: "mock store dropped".to_string(),
        })?;

        let server_version = store.read().unwrap().server.get(&key).copied();
        match server_version {
            Some(version) => {
                let mut state = self.state.write().unwrap();
                state.version = version;
                state.reloads += 1;
                Ok(self.clone())
            }
            None => Err(StoreError::NotFound {
                type_name: key.type_name().clone(),
                id: key.id().clone(),
            }),
        }
    }
}

// ============================================================================
// MOCK STORE
// ============================================================================

#[derive(Debug, Default)]
struct MockStoreInner {
    /// Authoritative server state: key -> current data generation.
    server: HashMap<RecordKey, u64>,
    /// Client-side cache of materialized record handles.
    cache: HashMap<RecordKey, MockRecord>,
    fetches: u64,
}

/// In-memory mock of [`RecordStore`] with a simulated server side.
#[derive(Debug, Default)]
pub struct MockStore {
    inner: Arc<RwLock<MockStoreInner>>,
}

impl MockStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear server, cache, and counters.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.server.clear();
        inner.cache.clear();
        inner.fetches = 0;
    }

    /// Put a record on the server side only; nothing is cached yet.
    pub fn insert_server(&self, type_name: &str, id: &str, version: u64) -> RecordKey {
        let key = RecordKey::new(type_name, id);
        self.inner
            .write()
            .unwrap()
            .server
            .insert(key.clone(), version);
        key
    }

    /// Put a record on the server and cache a handle at the same version.
    pub fn seed_cached(&self, type_name: &str, id: &str, version: u64) -> MockRecord {
        self.seed_cached_stale(type_name, id, version, version)
    }

    /// Put a record on the server at `server_version` while the cached
    /// handle lags at `cached_version`. This is the stale-cache shape the
    /// guard exists to repair.
    pub fn seed_cached_stale(
        &self,
        type_name: &str,
        id: &str,
        cached_version: u64,
        server_version: u64,
    ) -> MockRecord {
        let key = RecordKey::new(type_name, id);
        let record =
            MockRecord::persisted(key.clone(), cached_version, Arc::downgrade(&self.inner));
        let mut inner = self.inner.write().unwrap();
        inner.server.insert(key.clone(), server_version);
        inner.cache.insert(key, record.clone());
        record
    }

    /// Delete a record from the server side, leaving any cached handle
    /// dangling. Models a deletion by another user without notice.
    pub fn delete_from_server(&self, key: &RecordKey) {
        self.inner.write().unwrap().server.remove(key);
    }

    /// Number of server round-trip fetches performed.
    pub fn fetch_count(&self) -> u64 {
        self.inner.read().unwrap().fetches
    }

    /// Number of cached record handles.
    pub fn cached_count(&self) -> usize {
        self.inner.read().unwrap().cache.len()
    }
}

#[async_trait]
impl RecordStore for MockStore {
    type Record = MockRecord;

    fn get_cached(&self, key: &RecordKey) -> Option<MockRecord> {
        self.inner.read().unwrap().cache.get(key).cloned()
    }

    async fn fetch(&self, key: &RecordKey) -> StoreResult<MockRecord> {
        let mut inner = self.inner.write().unwrap();
        inner.fetches += 1;

        let Some(&version) = inner.server.get(key) else {
            return Err(StoreError::NotFound {
                type_name: key.type_name().clone(),
                id: key.id().clone(),
            });
        };

        let record = MockRecord::persisted(key.clone(), version, Arc::downgrade(&self.inner));
        inner.cache.insert(key.clone(), record.clone());
        Ok(record)
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for reloard types.

    use super::*;
    use proptest::prelude::*;

    /// Generate a random record id (opaque non-empty string).
    pub fn arb_record_id() -> impl Strategy<Value = RecordId> {
        "[a-z0-9]{1,12}".prop_map(RecordId::new)
    }

    /// Generate a random type name.
    pub fn arb_type_name() -> impl Strategy<Value = TypeName> {
        "[a-z]{1,10}".prop_map(TypeName::new)
    }

    /// Generate a random record key.
    pub fn arb_record_key() -> impl Strategy<Value = RecordKey> {
        (arb_type_name(), arb_record_id()).prop_map(|(type_name, id)| {
            RecordKey::new(type_name, id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_identity() {
        let store = MockStore::new();
        let record = store.seed_cached("course", "1", 1);
        let clone = record.clone();
        assert!(record.same_identity(&clone));
        assert!(!record.same_identity(&MockRecord::transient()));
    }

    #[tokio::test]
    async fn test_reload_syncs_to_server_version() {
        let store = MockStore::new();
        let record = store.seed_cached_stale("course", "1", 1, 4);
        assert_eq!(record.version(), 1);

        let reloaded = record.reload().await.unwrap();

        assert!(reloaded.same_identity(&record));
        assert_eq!(record.version(), 4);
        assert_eq!(record.reload_count(), 1);
    }

    #[tokio::test]
    async fn test_reload_of_transient_record_fails() {
        let record = MockRecord::transient();
        assert_eq!(record.persisted_id(), None);
        assert_eq!(record.reload().await.unwrap_err(), StoreError::NeverPersisted);
    }

    #[tokio::test]
    async fn test_reload_after_server_delete_is_not_found() {
        let store = MockStore::new();
        let record = store.seed_cached("course", "1", 1);
        store.delete_from_server(&RecordKey::new("course", "1"));

        let err = record.reload().await.unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                type_name: "course".into(),
                id: "1".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_populates_cache() {
        let store = MockStore::new();
        let key = store.insert_server("course", "2", 3);
        assert!(store.get_cached(&key).is_none());

        let fetched = store.fetch(&key).await.unwrap();

        assert_eq!(fetched.version(), 3);
        assert_eq!(store.fetch_count(), 1);
        let cached = store.get_cached(&key).unwrap();
        assert!(cached.same_identity(&fetched));
    }

    #[tokio::test]
    async fn test_fetch_missing_record_is_not_found() {
        let store = MockStore::new();
        let err = store
            .fetch(&RecordKey::new("course", "404"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
