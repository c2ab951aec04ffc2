//! Lua scripting support for named key-value collections.
//!
//! This module is the boundary between the embedding host and untrusted or
//! semi-trusted Lua scripts. Scripts get a single constructor global,
//! `KeyValue(name [, dbindex])`, returning an opaque handle with `set`,
//! `get`, `del` and `remove` methods; they never see connections,
//! credentials, or native memory.
//!
//! The scripting system consists of two components:
//!
//! - **keyvalue**: the binding itself (opaque handle + constructor global)
//! - **executor**: per-request script execution in isolated Lua states
//!
//! # Example
//!
//! ```rust
//! use luakv::store::ConnectionPool;
//! use luakv::{LuaExecutor, ScriptOptions, SessionState};
//!
//! # fn main() -> Result<(), luakv::Error> {
//! let session = SessionState::new(ConnectionPool::in_memory(), 0);
//! let executor = LuaExecutor::new(session, ScriptOptions::default());
//!
//! let result = executor.execute_with_result(r#"
//!     local kv = KeyValue("greetings")
//!     kv:set("en", "hello")
//!     return kv:get("en")
//! "#)?;
//!
//! assert_eq!(result, Some("hello".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod executor;
pub mod keyvalue;

pub use executor::LuaExecutor;
pub use keyvalue::{register, LuaKeyValue};
