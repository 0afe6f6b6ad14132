// Environment Store Port
// Key/value environment that child processes of a job inherit

use std::collections::HashMap;
use std::sync::RwLock;

/// Environment variable access
///
/// Implementations:
/// - JobEnvironment: explicit per-job environment context (below)
/// - ProcessEnvironment (infra-system): the real process environment
pub trait EnvironmentStore: Send + Sync {
    /// Current value of a variable, if set
    fn get(&self, key: &str) -> Option<String>;

    /// Set a variable, replacing any previous value
    fn set(&self, key: &str, value: &str);

    /// All variables, as applied to spawned child processes
    fn snapshot(&self) -> HashMap<String, String>;
}

/// In-memory environment context owned by a single job
///
/// Process spawners apply [`EnvironmentStore::snapshot`] to every child,
/// so nothing here touches the worker's global environment.
#[derive(Debug, Default)]
pub struct JobEnvironment {
    vars: RwLock<HashMap<String, String>>,
}

impl JobEnvironment {
    /// Empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment seeded with the given variables
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: RwLock::new(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Environment seeded from the current process environment
    pub fn inherit_process() -> Self {
        Self::with_vars(std::env::vars())
    }
}

impl EnvironmentStore for JobEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.vars
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.vars
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn snapshot(&self) -> HashMap<String, String> {
        self.vars
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
