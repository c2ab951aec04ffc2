//! # luakv - Opaque Lua bindings for named key-value collections
//!
//! luakv lets embedded Lua scripts, typically one per inbound request,
//! manipulate named key-value collections backed by a shared store, without
//! handing the scripts connections, credentials, or native memory.
//!
//! ## Architecture
//!
//! The crate consists of a few small layers:
//!
//! - **store**: the native [`KeyValue`](store::KeyValue) collection and the
//!   [`ConnectionPool`](store::ConnectionPool) it is bound to, over a
//!   pluggable [`StoreBackend`](store::StoreBackend)
//! - **session**: per-request [`SessionState`] supplying the pool and the
//!   default database index
//! - **script**: the Lua boundary — an opaque userdata handle per
//!   collection, a `KeyValue` constructor global, and a per-request
//!   [`LuaExecutor`]
//!
//! Native store errors never cross the boundary as Lua exceptions; they are
//! flattened to script values (`false`, `""`, or a `nil, message, 1`
//! failure triple from the constructor). Argument-type errors, by contrast,
//! abort the offending script call through Lua's own error convention.
//!
//! ## Example Usage
//!
//! ```rust
//! use luakv::store::ConnectionPool;
//! use luakv::{LuaExecutor, ScriptOptions, SessionState};
//!
//! # fn main() -> Result<(), luakv::Error> {
//! // Per request: pool and default database index from the host.
//! let session = SessionState::new(ConnectionPool::in_memory(), 0);
//! let executor = LuaExecutor::new(session, ScriptOptions::default());
//!
//! executor.execute(r#"
//!     local kv = KeyValue("users")
//!     kv:set("alice", "admin")
//!     assert(kv:get("alice") == "admin")
//! "#)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Module declarations
pub mod config;
pub mod error;
pub mod script;
pub mod session;
pub mod store;

// Re-exports
pub use config::ScriptOptions;
pub use error::{Error, Result};
pub use script::LuaExecutor;
pub use session::SessionState;
