use crate::holdings::{CustodyBalances, FloatPosition, Holdings};
use crate::provider::ProviderSource;
use crate::rates::FiatRates;
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// On-chain queries against the stable token and reserve contracts.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Circulating supply of `symbol`, in whole token units.
    async fn total_supply(&self, symbol: &str) -> Result<Decimal>;

    /// Units of `symbol` the reserve itself holds at `position`.
    async fn float_balance(&self, symbol: &str, position: FloatPosition) -> Result<Decimal>;

    /// Native asset balance of the reserve contract.
    async fn reserve_balance(&self) -> Result<Decimal>;

    async fn custody_balances(&self) -> Result<CustodyBalances>;

    /// Provider stamped on every measurement taken through this reader.
    fn source(&self) -> ProviderSource {
        ProviderSource::Forno
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn rates(&self) -> Result<FiatRates>;
}

#[async_trait]
pub trait HoldingsProvider: Send + Sync {
    async fn holdings(&self) -> Result<Holdings>;
}
