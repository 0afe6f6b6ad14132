// Process environment adapter
// The only place the worker's global environment is mutated.
use std::collections::HashMap;
use tracing::debug;

use worktemp_core::port::EnvironmentStore;

/// The real process environment
///
/// Every child spawned after `set` inherits the value. No synchronization
/// is provided against other code in the process touching the same keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    pub fn new() -> Self {
        Self
    }
}

impl EnvironmentStore for ProcessEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set(&self, key: &str, value: &str) {
        debug!(key = %key, "Setting process environment variable");
        std::env::set_var(key, value);
    }

    fn snapshot(&self) -> HashMap<String, String> {
        std::env::vars().collect()
    }
}
