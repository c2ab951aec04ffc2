//! Configuration options for script execution.

use std::time::Duration;

/// Configuration options for running Lua scripts.
#[derive(Debug, Clone)]
pub struct ScriptOptions {
    /// Maximum wall-clock time one script may run before it is aborted.
    /// Set to None to disable the limit.
    /// Default: 30 seconds
    pub timeout: Option<Duration>,

    /// Number of Lua instructions executed between timeout checks.
    /// Lower values abort closer to the deadline at some interpreter overhead.
    /// Default: 1000
    pub hook_interval: u32,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            hook_interval: 1000,
        }
    }
}
