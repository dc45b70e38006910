use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub enabled: bool,
    pub bind_addr: String,
    pub messages_per_second: u32,
    pub planets: Vec<String>,
    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            enabled: false,
            bind_addr: "127.0.0.1:9100".to_string(),
            messages_per_second: 1_000,
            planets: vec![
                "1".to_string(),
                "2".to_string(),
                "3".to_string(),
                "4".to_string(),
            ],
            seed: None,
        }
    }
}
