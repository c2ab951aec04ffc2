//! The Lua binding for named key-value collections.
//!
//! This is the host/script boundary: [`LuaKeyValue`] boxes one native
//! [`KeyValue`] inside a Lua userdata, and [`register`] installs the
//! `KeyValue` constructor global into one Lua state. The userdata carries
//! mlua's per-state type tag, so every method call validates the first
//! argument against that tag before any native call is made; a script
//! passing anything else gets a Lua argument error, never a corrupted
//! native handle.
//!
//! Native errors never cross the boundary as Lua exceptions. They are
//! flattened to script values:
//!
//! - mutating methods (`set`, `del`, `remove`) return a success boolean
//! - `get` returns the empty string on absence *or* failure
//! - a failed construction returns the triple `nil, message, 1`
//!
//! # Script surface
//!
//! ```lua
//! local kv = KeyValue("users")        -- session default database index
//! local kv2 = KeyValue("users", 3)    -- explicit database index
//!
//! kv:set("alice", "admin")            -- -> true
//! kv:get("alice")                     -- -> "admin"
//! kv:del("alice")                     -- -> true
//! kv:remove()                         -- -> true, deletes the collection
//! tostring(kv)                        -- -> "keyvalue"
//! ```

use crate::session::SessionState;
use crate::store::KeyValue;
use mlua::{Lua, MetaMethod, MultiValue, UserData, UserDataMethods, Value};

/// Opaque Lua handle wrapping one native [`KeyValue`] collection.
///
/// The wrapped collection is fixed at construction and never reassigned, so
/// a value carrying this userdata tag always holds a valid native reference.
/// Lua's garbage collector reclaims the handle once unreachable; no
/// native-side cleanup happens beyond dropping the pool clone inside.
pub struct LuaKeyValue {
    kv: KeyValue,
}

impl LuaKeyValue {
    pub(crate) fn new(kv: KeyValue) -> Self {
        Self { kv }
    }
}

impl UserData for LuaKeyValue {
    fn add_methods<'lua, M: UserDataMethods<'lua, Self>>(methods: &mut M) {
        // Fixed literal for diagnostic display; no native call.
        methods.add_meta_method(MetaMethod::ToString, |_, _, ()| Ok("keyvalue"));

        // kv:set(key, value) -> bool
        methods.add_method("set", |_, this, (key, value): (String, String)| {
            Ok(this.kv.set(&key, &value).is_ok())
        });

        // kv:get(key) -> string
        // Absence and native failure are both the empty string; scripts
        // cannot tell them apart and that is part of the contract.
        methods.add_method("get", |_, this, key: String| {
            Ok(this.kv.get(&key).ok().flatten().unwrap_or_default())
        });

        // kv:del(key) -> bool
        methods.add_method("del", |_, this, key: String| Ok(this.kv.del(&key).is_ok()));

        // kv:remove() -> bool
        // Deletes the collection's backing data. The handle stays valid;
        // later writes recreate the collection per the backend's contract.
        methods.add_method("remove", |_, this, ()| Ok(this.kv.remove().is_ok()));
    }
}

/// Installs the `KeyValue` constructor global into one Lua state.
///
/// Call exactly once per state, before running scripts. The constructor
/// takes a collection name and an optional database index; when the index
/// is omitted the session default is used. On success it returns the
/// handle; on native construction failure it returns `nil`, a message
/// string, and the number `1` so scripts can pattern-match on arity
/// instead of wrapping the call in `pcall`.
///
/// # Example
///
/// ```rust
/// use luakv::script::keyvalue;
/// use luakv::store::ConnectionPool;
/// use luakv::SessionState;
/// use mlua::Lua;
///
/// # fn main() -> mlua::Result<()> {
/// let session = SessionState::new(ConnectionPool::in_memory(), 0);
/// let lua = Lua::new();
/// keyvalue::register(&lua, &session)?;
///
/// lua.load(r#"
///     local kv = KeyValue("users")
///     kv:set("alice", "admin")
/// "#).exec()?;
/// # Ok(())
/// # }
/// ```
pub fn register(lua: &Lua, session: &SessionState) -> mlua::Result<()> {
    let pool = session.pool().clone();
    let default_dbindex = session.database_index();

    let constructor = lua.create_function(move |lua, (name, dbindex): (String, Option<i64>)| {
        // The second argument, when given, overrides the session default.
        let dbindex = dbindex.unwrap_or(default_dbindex);

        match KeyValue::new(&pool, &name) {
            Ok(mut kv) => {
                kv.select_database(dbindex);
                log::debug!("opened keyvalue collection {:?} (db {})", kv.name(), dbindex);
                let handle = lua.create_userdata(LuaKeyValue::new(kv))?;
                Ok(MultiValue::from_vec(vec![Value::UserData(handle)]))
            }
            Err(e) => Ok(MultiValue::from_vec(vec![
                Value::Nil,
                Value::String(lua.create_string(e.to_string())?),
                Value::Integer(1),
            ])),
        }
    })?;

    lua.globals().set("KeyValue", constructor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ConnectionPool, MemoryBackend, StoreBackend};
    use std::sync::Arc;

    fn setup_lua(dbindex: i64) -> (Arc<MemoryBackend>, ConnectionPool, Lua) {
        let backend = Arc::new(MemoryBackend::new());
        let backend_handle: Arc<dyn StoreBackend> = backend.clone();
        let pool = ConnectionPool::new(backend_handle);
        let session = SessionState::new(pool.clone(), dbindex);
        let lua = Lua::new();
        register(&lua, &session).unwrap();
        (backend, pool, lua)
    }

    #[test]
    fn test_constructor_returns_single_handle() {
        let (_backend, _pool, lua) = setup_lua(0);

        let arity: i64 = lua
            .load(r##"return select("#", KeyValue("users"))"##)
            .eval()
            .unwrap();
        assert_eq!(arity, 1);
    }

    #[test]
    fn test_tostring_literal() {
        let (_backend, _pool, lua) = setup_lua(0);

        let repr: String = lua
            .load(r#"return tostring(KeyValue("users"))"#)
            .eval()
            .unwrap();
        assert_eq!(repr, "keyvalue");
    }

    #[test]
    fn test_set_get_roundtrip() {
        let (_backend, _pool, lua) = setup_lua(0);

        let value: String = lua
            .load(
                r#"
                local kv = KeyValue("users")
                assert(kv:set("alice", "admin") == true)
                return kv:get("alice")
            "#,
            )
            .eval()
            .unwrap();
        assert_eq!(value, "admin");
    }

    #[test]
    fn test_get_absent_key_returns_empty_string() {
        let (_backend, _pool, lua) = setup_lua(0);

        let value: String = lua
            .load(r#"return KeyValue("users"):get("nobody")"#)
            .eval()
            .unwrap();
        assert_eq!(value, "");
    }

    #[test]
    fn test_del_then_get_returns_empty_string() {
        let (_backend, _pool, lua) = setup_lua(0);

        let value: String = lua
            .load(
                r#"
                local kv = KeyValue("users")
                kv:set("alice", "admin")
                assert(kv:del("alice") == true)
                return kv:get("alice")
            "#,
            )
            .eval()
            .unwrap();
        assert_eq!(value, "");
    }

    #[test]
    fn test_remove_deletes_backing_data() {
        let (backend, _pool, lua) = setup_lua(0);

        let after: String = lua
            .load(
                r#"
                local kv = KeyValue("users")
                kv:set("alice", "admin")
                kv:set("bob", "guest")
                assert(kv:remove() == true)
                return kv:get("alice")
            "#,
            )
            .eval()
            .unwrap();
        assert_eq!(after, "");
        assert_eq!(backend.collection_len(0, "users"), 0);
    }

    #[test]
    fn test_handle_usable_after_remove() {
        let (_backend, _pool, lua) = setup_lua(0);

        let value: String = lua
            .load(
                r#"
                local kv = KeyValue("users")
                kv:set("alice", "admin")
                kv:remove()
                kv:set("carol", "editor")
                return kv:get("carol")
            "#,
            )
            .eval()
            .unwrap();
        assert_eq!(value, "editor");
    }

    #[test]
    fn test_explicit_dbindex_overrides_default() {
        let (backend, _pool, lua) = setup_lua(0);

        lua.load(r#"KeyValue("users", 3):set("alice", "admin")"#)
            .exec()
            .unwrap();

        assert_eq!(backend.collection_len(0, "users"), 0);
        assert_eq!(
            backend.get(3, "users", "alice").unwrap(),
            Some("admin".to_string())
        );
    }

    #[test]
    fn test_default_dbindex_from_session() {
        let (backend, _pool, lua) = setup_lua(2);

        lua.load(r#"KeyValue("users"):set("alice", "admin")"#)
            .exec()
            .unwrap();

        assert_eq!(
            backend.get(2, "users", "alice").unwrap(),
            Some("admin".to_string())
        );
    }

    #[test]
    fn test_empty_collection_name_is_legal() {
        let (_backend, _pool, lua) = setup_lua(0);

        let value: String = lua
            .load(
                r#"
                local kv = KeyValue("")
                kv:set("k", "v")
                return kv:get("k")
            "#,
            )
            .eval()
            .unwrap();
        assert_eq!(value, "v");
    }

    #[test]
    fn test_constructor_failure_returns_triple() {
        let (_backend, pool, lua) = setup_lua(0);
        pool.close();

        let (is_nil, msg, code): (bool, String, i64) = lua
            .load(
                r#"
                local kv, msg, code = KeyValue("users")
                return kv == nil, msg, code
            "#,
            )
            .eval()
            .unwrap();
        assert!(is_nil);
        assert!(!msg.is_empty());
        assert_eq!(code, 1);
    }

    #[test]
    fn test_constructor_failure_arity_is_three() {
        let (_backend, pool, lua) = setup_lua(0);
        pool.close();

        let arity: i64 = lua
            .load(r##"return select("#", KeyValue("users"))"##)
            .eval()
            .unwrap();
        assert_eq!(arity, 3);
    }

    #[test]
    fn test_wrong_self_raises_argument_error() {
        let (backend, _pool, lua) = setup_lua(0);

        // Extract the method and call it with a non-handle first argument.
        let ok: bool = lua
            .load(
                r#"
                local kv = KeyValue("users")
                local ok = pcall(kv.set, 42, "alice", "admin")
                return ok
            "#,
            )
            .eval()
            .unwrap();
        assert!(!ok);

        // The failed dispatch must not have reached the store.
        assert_eq!(backend.collection_len(0, "users"), 0);
    }

    #[test]
    fn test_wrong_self_table_raises_argument_error() {
        let (_backend, _pool, lua) = setup_lua(0);

        let ok: bool = lua
            .load(
                r#"
                local kv = KeyValue("users")
                return pcall(kv.get, {}, "alice")
            "#,
            )
            .eval()
            .unwrap();
        assert!(!ok);
    }

    #[test]
    fn test_native_failure_flattens_to_script_values() {
        let (_backend, pool, lua) = setup_lua(0);

        lua.load(r#"kv = KeyValue("users") kv:set("alice", "admin")"#)
            .exec()
            .unwrap();

        pool.close();

        let (set_ok, got, del_ok, remove_ok): (bool, String, bool, bool) = lua
            .load(
                r#"
                return kv:set("alice", "root"),
                       kv:get("alice"),
                       kv:del("alice"),
                       kv:remove()
            "#,
            )
            .eval()
            .unwrap();
        assert!(!set_ok);
        assert_eq!(got, "");
        assert!(!del_ok);
        assert!(!remove_ok);
    }

    #[test]
    fn test_distinct_handles_same_identity() {
        let (_backend, _pool, lua) = setup_lua(0);

        let value: String = lua
            .load(
                r#"
                local a = KeyValue("shared")
                local b = KeyValue("shared")
                a:set("k", "v")
                return b:get("k")
            "#,
            )
            .eval()
            .unwrap();
        assert_eq!(value, "v");
    }
}
