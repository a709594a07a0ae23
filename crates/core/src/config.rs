use crate::holdings::FloatPosition;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReserveConfig {
    pub cache: CacheConfig,
    pub timeouts: TimeoutConfig,
    /// Token whose reserve-owned float is subtracted from circulation.
    pub primary_token: String,
    /// Stable tokens collected as one concurrent batch.
    pub stables: Vec<StableConfig>,
    /// Region-specific tokens reconciled one by one and appended after the batch.
    pub regional: Vec<StableConfig>,
    pub float_positions: Vec<FloatPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableConfig {
    pub symbol: String,
    /// Currency the token tracks.
    pub iso4217: String,
}

impl StableConfig {
    pub fn new(symbol: &str, iso4217: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            iso4217: iso4217.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub supply_ttl_ms: u64,
}

impl CacheConfig {
    pub fn supply_ttl(&self) -> Duration {
        Duration::from_millis(self.supply_ttl_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { supply_ttl_ms: 5_000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for any single external call.
    pub call_timeout_ms: u64,
}

impl TimeoutConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 10_000,
        }
    }
}

impl Default for ReserveConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            timeouts: TimeoutConfig::default(),
            primary_token: "cUSD".to_string(),
            stables: vec![
                StableConfig::new("cUSD", "USD"),
                StableConfig::new("cEUR", "EUR"),
                StableConfig::new("cREAL", "BRL"),
            ],
            regional: vec![
                StableConfig::new("eXOF", "XOF"),
                StableConfig::new("cKES", "KES"),
                StableConfig::new("PUSO", "PHP"),
                StableConfig::new("cCOP", "COP"),
            ],
            float_positions: FloatPosition::ALL.to_vec(),
        }
    }
}

impl ReserveConfig {
    /// Every configured token, batch first, then regional.
    pub fn all_tokens(&self) -> impl Iterator<Item = &StableConfig> {
        self.stables.iter().chain(self.regional.iter())
    }
}
