use serde::{Deserialize, Serialize};

/// Settings for a [`RootStore`](crate::store::RootStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store id. A short random id is generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Number of updates the queue holds before `enqueue` waits (default: 16).
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            id: None,
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_queue_capacity() -> usize {
    16
}
