//! Backend interface to the remote store.
//!
//! The binding layer never speaks the store's wire protocol itself. It goes
//! through [`StoreBackend`], a narrow interface covering exactly the four
//! collection operations the Lua surface needs. [`MemoryBackend`] implements
//! it in-process and is used by tests, demos, and embedders that want a local
//! store; a networked backend plugs in the same way.

use crate::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Narrow interface to the store serving named key-value collections.
///
/// A collection is addressed by `(database index, collection name)`. The
/// backend owns connection management and concurrency safety; implementations
/// must be safe to share across threads.
///
/// Semantics every implementation must honor:
///
/// - `set`/`del` against a collection whose backing data was removed
///   implicitly recreate it
/// - `get` of a missing collection or key is `Ok(None)`, not an error
/// - `del` of an absent key succeeds
pub trait StoreBackend: Send + Sync {
    /// Stores `value` under `key` in the given collection.
    fn set(&self, dbindex: i64, collection: &str, key: &str, value: &str) -> Result<()>;

    /// Retrieves the value stored under `key`, or `None` if absent.
    fn get(&self, dbindex: i64, collection: &str, key: &str) -> Result<Option<String>>;

    /// Deletes `key` from the collection.
    fn del(&self, dbindex: i64, collection: &str, key: &str) -> Result<()>;

    /// Deletes the entire collection's backing data.
    fn remove_collection(&self, dbindex: i64, collection: &str) -> Result<()>;
}

/// In-process [`StoreBackend`] keeping all collections in memory.
///
/// Collections live in a map keyed by `(database index, name)`, guarded by a
/// single [`RwLock`]. Good enough for the short, synchronous operations the
/// binding issues; there is no cross-key transaction to worry about.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<(i64, String), HashMap<String, String>>>,
}

impl MemoryBackend {
    /// Creates a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys currently stored in a collection.
    ///
    /// Test and introspection helper; not part of [`StoreBackend`].
    pub fn collection_len(&self, dbindex: i64, collection: &str) -> usize {
        self.collections
            .read()
            .get(&(dbindex, collection.to_string()))
            .map_or(0, HashMap::len)
    }
}

impl StoreBackend for MemoryBackend {
    fn set(&self, dbindex: i64, collection: &str, key: &str, value: &str) -> Result<()> {
        self.collections
            .write()
            .entry((dbindex, collection.to_string()))
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, dbindex: i64, collection: &str, key: &str) -> Result<Option<String>> {
        Ok(self
            .collections
            .read()
            .get(&(dbindex, collection.to_string()))
            .and_then(|entries| entries.get(key).cloned()))
    }

    fn del(&self, dbindex: i64, collection: &str, key: &str) -> Result<()> {
        // Deleting an absent key is a no-op, matching remote store semantics.
        self.collections
            .write()
            .entry((dbindex, collection.to_string()))
            .or_default()
            .remove(key);
        Ok(())
    }

    fn remove_collection(&self, dbindex: i64, collection: &str) -> Result<()> {
        self.collections
            .write()
            .remove(&(dbindex, collection.to_string()));
        Ok(())
    }
}
