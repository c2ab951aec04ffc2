//! LuaExecutor runs one script per isolated Lua state.
//!
//! Each execution builds a fresh Lua state, installs the key-value binding
//! for the request's session, optionally arms a timeout hook, and runs the
//! script to completion. Handles constructed by the script never outlive or
//! escape their state; concurrent requests each get their own executor call
//! and share nothing but the connection pool inside the session.

use crate::config::ScriptOptions;
use crate::script::keyvalue;
use crate::session::SessionState;
use crate::{Error, Result};
use mlua::Lua;
use std::time::{Duration, Instant};

/// LuaExecutor manages the execution of Lua scripts with store access.
///
/// Store operations issued by the script go straight through to the
/// connection pool; there is no buffering or rollback at this layer. A
/// script failure aborts the script but never the host process.
///
/// # Example
///
/// ```rust
/// use luakv::store::ConnectionPool;
/// use luakv::{LuaExecutor, ScriptOptions, SessionState};
///
/// # fn main() -> Result<(), luakv::Error> {
/// let session = SessionState::new(ConnectionPool::in_memory(), 0);
/// let executor = LuaExecutor::new(session, ScriptOptions::default());
///
/// executor.execute(r#"
///     local kv = KeyValue("users")
///     kv:set("alice", "admin")
/// "#)?;
/// # Ok(())
/// # }
/// ```
pub struct LuaExecutor {
    /// Per-request session state: pool and default database index
    session: SessionState,

    /// Execution options (timeout, hook interval)
    options: ScriptOptions,
}

impl LuaExecutor {
    /// Creates a new LuaExecutor for the given session.
    pub fn new(session: SessionState, options: ScriptOptions) -> Self {
        Self { session, options }
    }

    /// Executes a Lua script in a fresh, isolated Lua state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Script`] if:
    /// - The script has syntax errors
    /// - The script raises a runtime error
    /// - The script exceeds the timeout limit
    ///
    /// Native store failures do not end up here; they are flattened to
    /// script values by the binding itself.
    pub fn execute(&self, script: &str) -> Result<()> {
        let start_time = Instant::now();
        let lua = Lua::new();

        self.arm_timeout_hook(&lua, start_time);

        let result = (|| -> mlua::Result<()> {
            keyvalue::register(&lua, &self.session)?;
            lua.load(script).exec()
        })();

        match result {
            Ok(_) => {
                log::info!(
                    "Lua script executed successfully in {:?}",
                    start_time.elapsed()
                );
                Ok(())
            }
            Err(e) => {
                log::warn!("Lua script failed: {}", e);
                Err(Error::Script(format!("Lua script failed: {}", e)))
            }
        }
    }

    /// Executes a Lua script and returns its result value.
    ///
    /// Similar to [`execute`](LuaExecutor::execute), but captures the
    /// script's return value: `Some(string)` for a string result, `None`
    /// for nil or nothing, and a debug rendering for anything else.
    pub fn execute_with_result(&self, script: &str) -> Result<Option<String>> {
        let start_time = Instant::now();
        let lua = Lua::new();

        self.arm_timeout_hook(&lua, start_time);

        let result = (|| -> mlua::Result<mlua::Value<'_>> {
            keyvalue::register(&lua, &self.session)?;
            lua.load(script).eval::<mlua::Value<'_>>()
        })();

        match result {
            Ok(value) => {
                let return_value = match value {
                    mlua::Value::String(s) => Some(s.to_str()?.to_string()),
                    mlua::Value::Nil => None,
                    other => Some(format!("{:?}", other)),
                };

                log::info!(
                    "Lua script executed successfully in {:?}",
                    start_time.elapsed()
                );

                Ok(return_value)
            }
            Err(e) => {
                log::warn!("Lua script failed: {}", e);
                Err(Error::Script(format!("Lua script failed: {}", e)))
            }
        }
    }

    /// Sets the timeout for script execution.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.options.timeout = timeout;
    }

    /// Gets the current timeout setting.
    pub fn timeout(&self) -> Option<Duration> {
        self.options.timeout
    }

    fn arm_timeout_hook(&self, lua: &Lua, start_time: Instant) {
        if let Some(timeout) = self.options.timeout {
            lua.set_hook(
                mlua::HookTriggers {
                    every_nth_instruction: Some(self.options.hook_interval),
                    ..Default::default()
                },
                move |_lua, _debug| {
                    if start_time.elapsed() > timeout {
                        Err(mlua::Error::RuntimeError(
                            "Script execution timeout".to_string(),
                        ))
                    } else {
                        Ok(())
                    }
                },
            );
        }
    }
}
