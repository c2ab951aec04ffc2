//! Native key-value collections and the shared connection pool.
//!
//! [`KeyValue`] is the native side of the Lua binding: a handle to one named
//! collection, bound to one [`ConnectionPool`] and one database index. The
//! pool is the only resource shared across concurrent script contexts; it is
//! cheap to clone and its lifetime is managed by the embedding host, not by
//! the collections handed out from it.
//!
//! # Example
//!
//! ```rust
//! use luakv::store::{ConnectionPool, KeyValue};
//!
//! # fn main() -> Result<(), luakv::Error> {
//! let pool = ConnectionPool::in_memory();
//!
//! let mut kv = KeyValue::new(&pool, "users")?;
//! kv.select_database(0);
//!
//! kv.set("alice", "admin")?;
//! assert_eq!(kv.get("alice")?, Some("admin".to_string()));
//! # Ok(())
//! # }
//! ```

mod backend;

pub use backend::{MemoryBackend, StoreBackend};

use crate::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared handle to the store connection pool.
///
/// Cloning is cheap (an `Arc` bump) and every clone addresses the same
/// underlying backend. Once [`close`](ConnectionPool::close) is called, all
/// clones refuse further operations; collections created from the pool start
/// failing rather than touching a torn-down backend.
#[derive(Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    backend: Arc<dyn StoreBackend>,
    closed: AtomicBool,
}

impl ConnectionPool {
    /// Creates a pool over the given backend.
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                backend,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Creates a pool backed by an in-process [`MemoryBackend`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Marks the pool closed. Subsequent operations on any clone fail with
    /// [`Error::PoolClosed`].
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }

    /// Returns true if the pool has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    fn backend(&self) -> Result<&dyn StoreBackend> {
        if self.is_closed() {
            return Err(Error::PoolClosed);
        }
        Ok(self.inner.backend.as_ref())
    }
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// A handle to one named key-value collection in the store.
///
/// Holds a clone of the pool it was created from plus its selected database
/// index. Two handles with the same `(name, database index)` address the same
/// remote data but remain distinct instances; the binding layer does not
/// deduplicate them.
///
/// [`remove`](KeyValue::remove) deletes the collection's backing data; the
/// handle itself stays structurally valid and subsequent writes recreate the
/// collection per the backend's contract.
#[derive(Debug)]
pub struct KeyValue {
    pool: ConnectionPool,
    name: String,
    dbindex: i64,
}

impl KeyValue {
    /// Creates a handle to the named collection.
    ///
    /// The database index starts at 0; call
    /// [`select_database`](KeyValue::select_database) before first use to
    /// address a different logical partition.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::PoolClosed`] if the pool has been closed.
    pub fn new(pool: &ConnectionPool, name: &str) -> Result<Self> {
        // Constructing against a closed pool fails up front so the Lua
        // constructor can report it as a failure triple.
        if pool.is_closed() {
            return Err(Error::PoolClosed);
        }
        Ok(Self {
            pool: pool.clone(),
            name: name.to_string(),
            dbindex: 0,
        })
    }

    /// Selects the database index this collection addresses.
    pub fn select_database(&mut self, dbindex: i64) {
        self.dbindex = dbindex;
    }

    /// Returns the collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the selected database index.
    pub fn database_index(&self) -> i64 {
        self.dbindex
    }

    /// Stores `value` under `key`.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.pool.backend()?.set(self.dbindex, &self.name, key, value)
    }

    /// Retrieves the value stored under `key`, or `None` if absent.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.pool.backend()?.get(self.dbindex, &self.name, key)
    }

    /// Deletes `key` from the collection.
    pub fn del(&self, key: &str) -> Result<()> {
        self.pool.backend()?.del(self.dbindex, &self.name, key)
    }

    /// Deletes the entire collection's backing data.
    pub fn remove(&self) -> Result<()> {
        self.pool.backend()?.remove_collection(self.dbindex, &self.name)
    }
}
