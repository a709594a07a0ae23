//! Entry point for presentation layers.
//!
//! `ReserveMonitor` is built once at startup and owns the caches, so every
//! method here is safe to call repeatedly: redundant calls inside the TTL are
//! answered from memory.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use celo_reserve_core::{
    Allocation, ChainReader, CustodyBalances, FiatRates, Holdings, HoldingsProvider, ProviderResult,
    RateProvider, ReserveConfig, TokenModel,
};
use futures_util::future::join_all;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, info};

use crate::cache::TtlCache;
use crate::error::ReserveError;
use crate::holdings;
use crate::stables::{self, StableTotals};
use crate::supply::SupplyCollector;
use crate::targets::calculate_target_allocation;

const RATES_KEY: &str = "fiat-rates";
const HOLDINGS_KEY: &str = "reserve-holdings";

/// Combined view of reserve health and the allocation it implies.
#[derive(Debug, Clone, Serialize)]
pub struct ReserveHealth {
    pub outstanding_usd: Decimal,
    pub reserve_usd: Decimal,
    /// `reserve_usd / outstanding_usd`; `None` when nothing is outstanding.
    pub ratio: Option<Decimal>,
    /// Tokens missing from `outstanding_usd` because they could not be measured.
    pub excluded: Vec<String>,
    pub targets: Vec<Allocation>,
}

pub struct ReserveMonitor {
    collector: SupplyCollector,
    rates: Arc<dyn RateProvider>,
    holdings: Arc<dyn HoldingsProvider>,
    rate_cache: TtlCache<FiatRates, ReserveError>,
    holdings_cache: TtlCache<Holdings, ReserveError>,
    config: ReserveConfig,
}

impl ReserveMonitor {
    #[must_use]
    pub fn new(
        chain: Arc<dyn ChainReader>,
        rates: Arc<dyn RateProvider>,
        holdings: Arc<dyn HoldingsProvider>,
        config: ReserveConfig,
    ) -> Self {
        Self {
            collector: SupplyCollector::from_config(chain, &config),
            rates,
            holdings,
            rate_cache: TtlCache::new(),
            holdings_cache: TtlCache::new(),
            config,
        }
    }

    /// One reconciled record per configured token: the batch in configured
    /// order, then the regional tokens.
    ///
    /// # Errors
    ///
    /// Fails the whole pass if rates cannot be fetched or lack a currency a
    /// configured token needs. Individual token failures are returned as
    /// failed records instead.
    pub async fn stables(&self) -> Result<Vec<TokenModel>, ReserveError> {
        let primary = self.config.primary_token.as_str();

        let (rates, circulations, float) = tokio::join!(
            self.fiat_rates(),
            stables::circulations(&self.collector, &self.config.stables),
            stables::reserve_float(&self.collector, primary, &self.config.float_positions),
        );
        let rates = rates?;

        let mut tokens = Vec::with_capacity(self.config.stables.len() + self.config.regional.len());
        for (token, circulation) in self.config.stables.iter().zip(&circulations) {
            let rate = stables::rate_for(&rates, token)?;
            let float = (token.symbol == primary).then_some(&float);
            tokens.push(stables::reconcile(circulation, rate, float));
        }

        let regional_rates = self
            .config
            .regional
            .iter()
            .map(|token| stables::rate_for(&rates, token))
            .collect::<Result<Vec<_>, _>>()?;
        let regional = self
            .config
            .regional
            .iter()
            .zip(regional_rates)
            .map(|(token, rate)| stables::regional_token(&self.collector, token, rate));
        tokens.extend(join_all(regional).await);

        let failed = tokens.iter().filter(|t| t.has_error()).count();
        info!(tokens = tokens.len(), failed, "Stable tokens reconciled");
        Ok(tokens)
    }

    /// Outstanding stable value and the tokens it had to leave out.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::stables`].
    pub async fn stable_totals(&self) -> Result<StableTotals, ReserveError> {
        let tokens = self.stables().await?;
        Ok(stables::stable_totals(&tokens))
    }

    /// Sum of `value` over every measured token, rounded to cents.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::stables`].
    pub async fn total_stable_value_usd(&self) -> Result<Decimal, ReserveError> {
        Ok(self.stable_totals().await?.usd)
    }

    /// Total reserve value in USD.
    ///
    /// # Errors
    ///
    /// Returns `ReserveError::Holdings` if the holdings source fails or times out.
    pub async fn total_reserve_usd(&self) -> Result<Decimal, ReserveError> {
        let holdings = self.reserve_holdings().await?;
        Ok(holdings::total_reserve_usd(&holdings))
    }

    /// Reserve value divided by outstanding stable value, `None` when
    /// nothing is outstanding.
    ///
    /// # Errors
    ///
    /// Fails if either total cannot be computed.
    pub async fn backing_ratio(&self) -> Result<Option<Decimal>, ReserveError> {
        let (outstanding, reserve) =
            tokio::try_join!(self.total_stable_value_usd(), self.total_reserve_usd())?;
        Ok(reserve.checked_div(outstanding))
    }

    /// Totals, ratio, and target allocation from one concurrent pass.
    ///
    /// # Errors
    ///
    /// Any failure of either side is returned as is; no partial health is produced.
    pub async fn health(&self) -> Result<ReserveHealth, ReserveError> {
        let (totals, reserve_usd) =
            tokio::try_join!(self.stable_totals(), self.total_reserve_usd())?;

        let health = ReserveHealth {
            outstanding_usd: totals.usd,
            reserve_usd,
            ratio: reserve_usd.checked_div(totals.usd),
            excluded: totals.excluded,
            targets: calculate_target_allocation(totals.usd, reserve_usd),
        };

        info!(
            outstanding_usd = %health.outstanding_usd,
            reserve_usd = %health.reserve_usd,
            ratio = ?health.ratio,
            "Reserve health computed"
        );
        Ok(health)
    }

    pub async fn custody_balances(&self) -> ProviderResult<CustodyBalances> {
        self.collector.custody_balances().await
    }

    pub async fn reserve_balance(&self) -> ProviderResult<Decimal> {
        self.collector.reserve_balance().await
    }

    async fn fiat_rates(&self) -> Result<FiatRates, ReserveError> {
        self.rate_cache
            .get_or_save(
                RATES_KEY,
                || async {
                    bounded(self.call_timeout(), self.rates.rates())
                        .await
                        .map_err(ReserveError::Rates)
                },
                self.config.cache.supply_ttl(),
            )
            .await
            .inspect_err(|e| error!(error = %e, "Aborting aggregation"))
    }

    async fn reserve_holdings(&self) -> Result<Holdings, ReserveError> {
        self.holdings_cache
            .get_or_save(
                HOLDINGS_KEY,
                || async {
                    bounded(self.call_timeout(), self.holdings.holdings())
                        .await
                        .map_err(ReserveError::Holdings)
                },
                self.config.cache.supply_ttl(),
            )
            .await
            .inspect_err(|e| error!(error = %e, "Reserve holdings unavailable"))
    }

    fn call_timeout(&self) -> Duration {
        self.config.timeouts.call_timeout()
    }
}

/// Runs `call` under `deadline`, flattening both failure kinds into a message.
async fn bounded<T>(
    deadline: Duration,
    call: impl Future<Output = anyhow::Result<T>>,
) -> Result<T, String> {
    match tokio::time::timeout(deadline, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(format!("{e:#}")),
        Err(_) => Err(format!("no answer within {}ms", deadline.as_millis())),
    }
}
