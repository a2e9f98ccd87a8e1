//! Registry configuration.

use serde::{Deserialize, Serialize};

/// What a dispatch pass does when a handler returns an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// Stop at the first failing handler and return its error.
    /// Handlers after it in the snapshot are not invoked.
    #[default]
    FailFast,
    /// Invoke every handler in the snapshot and collect failures
    /// into the dispatch report.
    Isolate,
}

/// Configuration shared by `Subject` and `PubSub`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Handler failure behavior.
    /// Default: fail fast
    pub dispatch: DispatchPolicy,

    /// Drop a topic's entry once its last subscriber is removed.
    /// Only used by `PubSub`. Default: true
    pub prune_empty_topics: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchPolicy::FailFast,
            prune_empty_topics: true,
        }
    }
}

impl RegistryConfig {
    /// Default configuration with failures isolated per handler.
    pub fn isolated() -> Self {
        Self {
            dispatch: DispatchPolicy::Isolate,
            ..Default::default()
        }
    }
}
