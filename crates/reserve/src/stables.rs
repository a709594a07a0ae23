//! Reconciliation of stable token supplies into valued `TokenModel` records.
//!
//! # Pipeline
//! 1. Rates, batch supplies, and the primary token's reserve-owned float are
//!    fetched concurrently by the caller.
//! 2. A token whose supply failed becomes a fully empty failed record.
//! 3. Otherwise `value = units * rate`.
//! 4. For the primary token the reserve-owned float is subtracted from the
//!    units before valuing.
//! 5. Regional tokens go through `regional_token`, one dedicated accessor per
//!    token, and are appended after the batch.
//!
//! Amounts stay `Decimal` end to end; the total is rounded to cents once.

use celo_reserve_core::{FiatRates, FloatPosition, Measurement, ProviderResult, StableConfig, TokenModel};
use futures_util::future::join_all;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ReserveError;
use crate::supply::SupplyCollector;

/// Raw circulating supply of one configured token.
#[derive(Debug, Clone)]
pub struct Circulation {
    pub symbol: String,
    pub iso4217: String,
    pub units: ProviderResult<Decimal>,
}

/// Aggregate USD value of all stable tokens that could be measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StableTotals {
    /// Sum of `value` over successful records, rounded to cents.
    pub usd: Decimal,
    /// Tokens left out of `usd` because their measurement failed.
    pub excluded: Vec<String>,
}

/// Fetches the supply of every token in `tokens` concurrently, in input order.
pub async fn circulations(collector: &SupplyCollector, tokens: &[StableConfig]) -> Vec<Circulation> {
    let futures = tokens.iter().map(|token| async move {
        Circulation {
            symbol: token.symbol.clone(),
            iso4217: token.iso4217.clone(),
            units: collector.stable_supply(&token.symbol).await,
        }
    });
    join_all(futures).await
}

/// Total units of `symbol` held by the reserve across `positions`.
///
/// All positions are looked up concurrently. The first failing position makes
/// the whole float a failure.
pub async fn reserve_float(
    collector: &SupplyCollector,
    symbol: &str,
    positions: &[FloatPosition],
) -> ProviderResult<Decimal> {
    let lookups = positions
        .iter()
        .map(|position| collector.float_amount(symbol, *position));
    let amounts = join_all(lookups).await;

    let mut total = Decimal::ZERO;
    for amount in amounts {
        let amount = amount?;
        debug!(token = symbol, amount = %amount.value, "Reserve-owned float");
        total += amount.value;
    }

    Ok(Measurement::new(total, collector.source()))
}

/// Looks up the rate a token needs.
///
/// # Errors
/// Returns `ReserveError::MissingRate` if the table has no entry for the
/// token's currency.
pub fn rate_for(rates: &FiatRates, token: &StableConfig) -> Result<Decimal, ReserveError> {
    rates
        .get(&token.iso4217)
        .ok_or_else(|| ReserveError::MissingRate {
            currency: token.iso4217.clone(),
            token: token.symbol.clone(),
        })
}

/// Turns one circulation into a record.
///
/// `float` is only passed for the primary token. A failed supply or a failed
/// float both yield a failed record.
#[must_use]
pub fn reconcile(
    circulation: &Circulation,
    rate: Decimal,
    float: Option<&ProviderResult<Decimal>>,
) -> TokenModel {
    let supply = match &circulation.units {
        Ok(supply) => supply,
        Err(e) => {
            warn!(token = %circulation.symbol, error = %e, "Supply unavailable, token excluded");
            return TokenModel::failed(&circulation.symbol);
        }
    };

    let mut units = supply.value;
    if let Some(float) = float {
        match float {
            Ok(float) => units -= float.value,
            Err(e) => {
                warn!(
                    token = %circulation.symbol,
                    error = %e,
                    "Reserve-owned float unavailable, token excluded"
                );
                return TokenModel::failed(&circulation.symbol);
            }
        }
    }

    TokenModel::reconciled(&circulation.symbol, units, units * rate, supply.time)
}

/// Dedicated accessor for a single regional token, valued at `rate`.
///
/// Never fails the pass: a failed supply becomes a failed record for this
/// token only.
pub async fn regional_token(collector: &SupplyCollector, token: &StableConfig, rate: Decimal) -> TokenModel {
    match collector.stable_supply(&token.symbol).await {
        Ok(supply) => TokenModel::reconciled(&token.symbol, supply.value, supply.value * rate, supply.time),
        Err(e) => {
            warn!(token = %token.symbol, error = %e, "Regional supply unavailable, token excluded");
            TokenModel::failed(&token.symbol)
        }
    }
}

/// Sums the value of every successful record, rounded to two decimals.
///
/// Failed records contribute nothing and are listed in `excluded` so the
/// caller can flag the total as incomplete.
#[must_use]
pub fn stable_totals(tokens: &[TokenModel]) -> StableTotals {
    let mut sum = Decimal::ZERO;
    let mut excluded = Vec::new();

    for token in tokens {
        match token.value() {
            Some(value) => sum += value,
            None => excluded.push(token.token().to_string()),
        }
    }

    if !excluded.is_empty() {
        warn!(excluded = ?excluded, "Stable total excludes unmeasured tokens");
    }

    StableTotals {
        usd: round_cents(sum),
        excluded,
    }
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use celo_reserve_core::{ProviderFailure, ProviderSource};
    use rust_decimal_macros::dec;

    fn circulation(symbol: &str, units: ProviderResult<Decimal>) -> Circulation {
        Circulation {
            symbol: symbol.to_string(),
            iso4217: "USD".to_string(),
            units,
        }
    }

    fn ok(value: Decimal) -> ProviderResult<Decimal> {
        Ok(Measurement::new(value, ProviderSource::Forno))
    }

    fn failed() -> ProviderResult<Decimal> {
        Err(ProviderFailure::new(ProviderSource::Forno, "timeout"))
    }

    #[test]
    fn failed_supply_yields_empty_record() {
        let model = reconcile(&circulation("cEUR", failed()), dec!(1.1), None);

        assert!(model.has_error());
        assert!(model.units().is_none());
        assert!(model.value().is_none());
        assert!(model.updated().is_none());
    }

    #[test]
    fn value_is_units_times_rate() {
        let model = reconcile(&circulation("cEUR", ok(dec!(200))), dec!(1.1), None);

        assert!(!model.has_error());
        assert_eq!(model.units(), Some(dec!(200)));
        assert_eq!(model.value(), Some(dec!(220)));
    }

    #[test]
    fn primary_float_is_subtracted_from_units_and_value() {
        let model = reconcile(
            &circulation("cUSD", ok(dec!(1000))),
            dec!(0.99),
            Some(&ok(dec!(150))),
        );

        assert_eq!(model.units(), Some(dec!(850)));
        assert_eq!(model.value(), Some(dec!(841.5)));
    }

    #[test]
    fn failed_float_fails_primary_only() {
        let model = reconcile(&circulation("cUSD", ok(dec!(1000))), Decimal::ONE, Some(&failed()));
        assert!(model.has_error());
        assert!(model.value().is_none());
    }

    #[test]
    fn missing_rate_is_an_error() {
        let rates: FiatRates = [("USD".to_string(), Decimal::ONE)].into_iter().collect();
        let err = rate_for(&rates, &StableConfig::new("cKES", "KES")).unwrap_err();
        assert!(matches!(err, ReserveError::MissingRate { .. }));
    }

    #[test]
    fn totals_skip_failed_records() {
        let updated = chrono::Utc::now();
        let tokens = vec![
            TokenModel::reconciled("cUSD", dec!(100), dec!(100.004), updated),
            TokenModel::failed("cEUR"),
            TokenModel::reconciled("cREAL", dec!(50), dec!(10.002), updated),
        ];

        let totals = stable_totals(&tokens);

        assert_eq!(totals.usd, dec!(110.01));
        assert_eq!(totals.excluded, vec!["cEUR".to_string()]);
    }

    #[test]
    fn totals_round_half_away_from_zero() {
        assert_eq!(round_cents(dec!(0.125)), dec!(0.13));
        assert_eq!(round_cents(dec!(-0.125)), dec!(-0.13));
        assert_eq!(round_cents(dec!(2.5)), dec!(2.5));
    }

    #[test]
    fn totals_do_not_drift_like_floats() {
        let updated = chrono::Utc::now();
        let tokens: Vec<TokenModel> = (0..10)
            .map(|i| TokenModel::reconciled(format!("t{i}"), Decimal::ONE, dec!(0.1), updated))
            .collect();

        assert_eq!(stable_totals(&tokens).usd, Decimal::ONE);
    }

    #[test]
    fn totals_of_nothing_are_zero() {
        let totals = stable_totals(&[]);
        assert!(totals.usd.is_zero());
        assert!(totals.excluded.is_empty());
    }
}
