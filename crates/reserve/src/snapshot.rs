//! File-backed collaborator answering chain, rate, and holdings queries from a
//! recorded JSON snapshot.
//!
//! A snapshot looks like:
//!
//! ```json
//! {
//!   "supplies": { "cUSD": 1000000.0, "cEUR": 250000.0 },
//!   "floats": [ { "token": "cUSD", "position": "curve-pool", "amount": 1500.0 } ],
//!   "reserve_balance": 120000000.0,
//!   "custody": { "custody": 1.0, "frozen": 2.0, "unfrozen": 3.0 },
//!   "rates": { "USD": 1.0, "EUR": 1.08 },
//!   "holdings": { "celo": { ... }, "otherAssets": [ ... ] }
//! }
//! ```
//!
//! Tokens absent from `supplies` answer with an error, the same way a real
//! chain query would fail for that token.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use celo_reserve_core::{
    ChainReader, CustodyBalances, FiatRates, FloatPosition, Holdings, HoldingsProvider,
    ProviderSource, RateProvider,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct FloatBalance {
    pub token: String,
    pub position: FloatPosition,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotProvider {
    #[serde(default)]
    supplies: HashMap<String, Decimal>,
    #[serde(default)]
    floats: Vec<FloatBalance>,
    #[serde(default)]
    reserve_balance: Option<Decimal>,
    #[serde(default)]
    custody: Option<CustodyBalances>,
    #[serde(default)]
    rates: Option<FiatRates>,
    #[serde(default)]
    holdings: Option<Holdings>,
}

impl SnapshotProvider {
    /// Reads a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid snapshot.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("parsing snapshot {}", path.display()))
    }

    /// # Errors
    ///
    /// Returns an error if `raw` is not a valid snapshot.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[async_trait]
impl ChainReader for SnapshotProvider {
    async fn total_supply(&self, symbol: &str) -> Result<Decimal> {
        self.supplies
            .get(symbol)
            .copied()
            .ok_or_else(|| anyhow!("no supply recorded for {symbol}"))
    }

    async fn float_balance(&self, symbol: &str, position: FloatPosition) -> Result<Decimal> {
        // Unrecorded positions hold nothing.
        Ok(self
            .floats
            .iter()
            .filter(|f| f.token == symbol && f.position == position)
            .map(|f| f.amount)
            .sum())
    }

    async fn reserve_balance(&self) -> Result<Decimal> {
        self.reserve_balance
            .ok_or_else(|| anyhow!("no reserve balance recorded"))
    }

    async fn custody_balances(&self) -> Result<CustodyBalances> {
        self.custody
            .ok_or_else(|| anyhow!("no custody balances recorded"))
    }

    fn source(&self) -> ProviderSource {
        ProviderSource::Snapshot
    }
}

#[async_trait]
impl RateProvider for SnapshotProvider {
    async fn rates(&self) -> Result<FiatRates> {
        self.rates.clone().ok_or_else(|| anyhow!("no rates recorded"))
    }
}

#[async_trait]
impl HoldingsProvider for SnapshotProvider {
    async fn holdings(&self) -> Result<Holdings> {
        self.holdings
            .clone()
            .ok_or_else(|| anyhow!("no holdings recorded"))
    }
}
