use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Maximum number of trades retained in the window.
    pub capacity: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        AggregatorConfig {
            capacity: crate::DEFAULT_WINDOW_CAPACITY,
        }
    }
}
