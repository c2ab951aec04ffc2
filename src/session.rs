//! Per-request session state supplied by the embedding host.

use crate::store::ConnectionPool;

/// State the embedding host derives per request: which connection pool to
/// use and which database index collections default to.
///
/// In a web host this is typically built from the session/permission
/// subsystem once per inbound request and handed to the script executor.
/// Cloning is cheap; the pool inside is shared.
#[derive(Debug, Clone)]
pub struct SessionState {
    pool: ConnectionPool,
    dbindex: i64,
}

impl SessionState {
    /// Creates session state over the given pool and default database index.
    pub fn new(pool: ConnectionPool, dbindex: i64) -> Self {
        Self { pool, dbindex }
    }

    /// Returns the shared connection pool for this request.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Returns the default database index for this request.
    pub fn database_index(&self) -> i64 {
        self.dbindex
    }
}
