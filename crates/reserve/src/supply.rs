//! Cached chain measurements.
//!
//! Every accessor runs its chain call under a deadline, converts the outcome
//! into a `ProviderResult`, and memoizes successes for the configured TTL.
//! A failing call never panics or propagates; it comes back as `Err` for that
//! source only and is retried on the next access.

use celo_reserve_core::{
    ChainReader, CustodyBalances, FloatPosition, Measurement, ProviderFailure, ProviderResult,
    ProviderSource, ReserveConfig,
};
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::cache::TtlCache;

const RESERVE_BALANCE_KEY: &str = "reserve-celo-balance";
const CUSTODY_KEY: &str = "reserve-celo-custody";

pub struct SupplyCollector {
    chain: Arc<dyn ChainReader>,
    amounts: TtlCache<Measurement<Decimal>, ProviderFailure>,
    custody: TtlCache<Measurement<CustodyBalances>, ProviderFailure>,
    ttl: Duration,
    call_timeout: Duration,
}

impl SupplyCollector {
    #[must_use]
    pub fn new(chain: Arc<dyn ChainReader>, ttl: Duration, call_timeout: Duration) -> Self {
        Self {
            chain,
            amounts: TtlCache::new(),
            custody: TtlCache::new(),
            ttl,
            call_timeout,
        }
    }

    #[must_use]
    pub fn from_config(chain: Arc<dyn ChainReader>, config: &ReserveConfig) -> Self {
        Self::new(
            chain,
            config.cache.supply_ttl(),
            config.timeouts.call_timeout(),
        )
    }

    /// Circulating supply of `symbol`.
    pub async fn stable_supply(&self, symbol: &str) -> ProviderResult<Decimal> {
        let key = format!("cSTABLE-{symbol}-supply");
        self.amounts
            .get_or_save(
                &key,
                || self.measure(symbol, self.chain.total_supply(symbol)),
                self.ttl,
            )
            .await
    }

    /// Units of `symbol` the reserve holds at `position`.
    pub async fn float_amount(&self, symbol: &str, position: FloatPosition) -> ProviderResult<Decimal> {
        let key = format!("{position}-{symbol}");
        self.amounts
            .get_or_save(
                &key,
                || self.measure(&key, self.chain.float_balance(symbol, position)),
                self.ttl,
            )
            .await
    }

    /// Native asset balance of the reserve contract.
    pub async fn reserve_balance(&self) -> ProviderResult<Decimal> {
        self.amounts
            .get_or_save(
                RESERVE_BALANCE_KEY,
                || self.measure(RESERVE_BALANCE_KEY, self.chain.reserve_balance()),
                self.ttl,
            )
            .await
    }

    pub async fn custody_balances(&self) -> ProviderResult<CustodyBalances> {
        self.custody
            .get_or_save(
                CUSTODY_KEY,
                || self.measure(CUSTODY_KEY, self.chain.custody_balances()),
                self.ttl,
            )
            .await
    }

    async fn measure<T>(
        &self,
        label: &str,
        call: impl Future<Output = anyhow::Result<T>>,
    ) -> ProviderResult<T> {
        let provider = self.chain.source();
        let failure = match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(value)) => return Ok(Measurement::new(value, provider)),
            Ok(Err(e)) => ProviderFailure::new(provider, format!("{e:#}")),
            Err(_) => ProviderFailure::timed_out(provider, self.call_timeout),
        };
        warn!(source = label, error = %failure, "Chain measurement failed");
        Err(failure)
    }

    /// Provider stamped on measurements from this collector.
    pub fn source(&self) -> ProviderSource {
        self.chain.source()
    }
}
