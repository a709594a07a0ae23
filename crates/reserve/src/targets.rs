//! Target allocation policy.
//!
//! Maps outstanding stable value and total reserve value to target weights
//! for a fixed catalog of six instruments. Pure and synchronous.
//!
//! ## Policy
//! With backing ratio `r = reserve / outstanding`:
//! - `r >= 2`: stables `1/r`, CELO `0.5`, the remainder goes to other crypto
//!   assets, of which 2% is carved out for natural capital
//! - `1 <= r < 2`: stables `1/r`, CELO the rest
//! - `r < 1`: everything in stables
//! - nothing outstanding: every weight 0
//!
//! Class weights are exact decimals. A class weight is split evenly across the
//! catalog instruments of that class and converted to a float percent last.
//!
//! ```text
//! outstanding = 100, reserve = 250  =>  r = 2.5
//! CELO 50 | BTC 4.9 | ETH 4.9 | DAI 20 | USDC 20 | cMC02 0.2
//! ```

use celo_reserve_core::{Allocation, AssetType};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const TARGET_CATALOG: [(AssetType, &str); 6] = [
    (AssetType::CeloNativeAsset, "CELO"),
    (AssetType::OtherCryptoAssets, "BTC"),
    (AssetType::OtherCryptoAssets, "ETH"),
    (AssetType::StableValue, "DAI"),
    (AssetType::StableValue, "USDC"),
    (AssetType::NaturalCapital, "cMC02"),
];

/// Backing ratio from which the reserve counts as over-collateralized.
const OVER_COLLATERALIZED_RATIO: Decimal = dec!(2);
const CELO_TARGET_WHEN_OVER_COLLATERALIZED: Decimal = dec!(0.5);
/// Share of the other-crypto weight reserved for natural capital.
const NATURAL_CAPITAL_SHARE: Decimal = dec!(0.02);

/// Target weight of each asset class, as fractions of the reserve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassTargets {
    pub celo: Decimal,
    /// Net of the natural capital carve-out.
    pub other_crypto: Decimal,
    pub stables: Decimal,
    pub natural_capital: Decimal,
}

impl ClassTargets {
    #[must_use]
    pub fn from_totals(outstanding_usd: Decimal, reserve_usd: Decimal) -> Self {
        let Some(ratio) = reserve_usd.checked_div(outstanding_usd) else {
            return Self::default();
        };

        if ratio >= OVER_COLLATERALIZED_RATIO {
            let stables = Decimal::ONE / ratio;
            let celo = CELO_TARGET_WHEN_OVER_COLLATERALIZED;
            let other_crypto = Decimal::ONE - stables - celo;
            let natural_capital = other_crypto * NATURAL_CAPITAL_SHARE;
            Self {
                celo,
                other_crypto: other_crypto - natural_capital,
                stables,
                natural_capital,
            }
        } else if ratio >= Decimal::ONE {
            let stables = Decimal::ONE / ratio;
            Self {
                celo: Decimal::ONE - stables,
                stables,
                ..Self::default()
            }
        } else {
            Self {
                stables: Decimal::ONE,
                ..Self::default()
            }
        }
    }

    fn for_type(&self, asset_type: AssetType) -> Decimal {
        match asset_type {
            AssetType::CeloNativeAsset => self.celo,
            AssetType::OtherCryptoAssets => self.other_crypto,
            AssetType::StableValue => self.stables,
            AssetType::NaturalCapital => self.natural_capital,
        }
    }
}

/// Target allocation across the full catalog, in catalog order.
///
/// Always returns all six instruments, including those at 0%. Each call
/// builds a fresh vector.
#[must_use]
pub fn calculate_target_allocation(outstanding_usd: Decimal, reserve_usd: Decimal) -> Vec<Allocation> {
    let targets = ClassTargets::from_totals(outstanding_usd, reserve_usd);

    TARGET_CATALOG
        .iter()
        .map(|&(asset_type, token)| Allocation {
            asset_type,
            token: token.to_string(),
            percent: percent(asset_type, targets.for_type(asset_type)),
        })
        .collect()
}

fn percent(asset_type: AssetType, target: Decimal) -> f64 {
    let members = TARGET_CATALOG.iter().filter(|(t, _)| *t == asset_type).count();
    (target * Decimal::ONE_HUNDRED / Decimal::from(members))
        .to_f64()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn percent_of(allocations: &[Allocation], token: &str) -> f64 {
        allocations
            .iter()
            .find(|a| a.token == token)
            .map(|a| a.percent)
            .unwrap()
    }

    fn total(allocations: &[Allocation]) -> f64 {
        allocations.iter().map(|a| a.percent).sum()
    }

    #[test]
    fn over_collateralized_split() {
        let allocations = calculate_target_allocation(dec!(100), dec!(250));

        assert!((percent_of(&allocations, "CELO") - 50.0).abs() < TOLERANCE);
        assert!(
            (percent_of(&allocations, "DAI") + percent_of(&allocations, "USDC") - 40.0).abs()
                < TOLERANCE
        );
        assert!(
            (percent_of(&allocations, "BTC") + percent_of(&allocations, "ETH") - 9.8).abs()
                < TOLERANCE
        );
        assert!((percent_of(&allocations, "cMC02") - 0.2).abs() < TOLERANCE);
        assert!((total(&allocations) - 100.0).abs() < TOLERANCE);
    }

    #[test]
    fn class_weights_are_exact() {
        let targets = ClassTargets::from_totals(dec!(100), dec!(250));

        assert_eq!(targets.stables, dec!(0.4));
        assert_eq!(targets.celo, dec!(0.5));
        assert_eq!(targets.other_crypto, dec!(0.098));
        assert_eq!(targets.natural_capital, dec!(0.002));
    }

    #[test]
    fn class_weight_split_evenly() {
        let allocations = calculate_target_allocation(dec!(100), dec!(250));

        assert!((percent_of(&allocations, "BTC") - percent_of(&allocations, "ETH")).abs() < TOLERANCE);
        assert!((percent_of(&allocations, "DAI") - 20.0).abs() < TOLERANCE);
        assert!((percent_of(&allocations, "USDC") - 20.0).abs() < TOLERANCE);
    }

    #[test]
    fn exactly_two_is_over_collateralized() {
        let targets = ClassTargets::from_totals(dec!(100), dec!(200));

        assert_eq!(targets.stables, dec!(0.5));
        assert_eq!(targets.celo, dec!(0.5));
        assert!(targets.other_crypto.is_zero());
        assert!(targets.natural_capital.is_zero());
    }

    #[test]
    fn between_one_and_two_has_no_other_crypto() {
        let allocations = calculate_target_allocation(dec!(100), dec!(150));

        let stables = percent_of(&allocations, "DAI") + percent_of(&allocations, "USDC");
        assert!((stables - 200.0 / 3.0).abs() < 1e-6);
        assert!((percent_of(&allocations, "CELO") - 100.0 / 3.0).abs() < 1e-6);
        assert!(percent_of(&allocations, "BTC").abs() < TOLERANCE);
        assert!(percent_of(&allocations, "ETH").abs() < TOLERANCE);
        assert!(percent_of(&allocations, "cMC02").abs() < TOLERANCE);
        assert!((total(&allocations) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn under_collateralized_is_all_stables() {
        let allocations = calculate_target_allocation(dec!(100), dec!(80));

        assert!((percent_of(&allocations, "DAI") - 50.0).abs() < TOLERANCE);
        assert!((percent_of(&allocations, "USDC") - 50.0).abs() < TOLERANCE);
        assert!(percent_of(&allocations, "CELO").abs() < TOLERANCE);
        assert!((total(&allocations) - 100.0).abs() < TOLERANCE);
    }

    #[test]
    fn nothing_outstanding_yields_zeros() {
        for reserve in [Decimal::ZERO, dec!(250)] {
            let allocations = calculate_target_allocation(Decimal::ZERO, reserve);
            assert_eq!(allocations.len(), 6);
            assert!(allocations.iter().all(|a| a.percent == 0.0));
        }
    }

    #[test]
    fn catalog_order_and_types_are_fixed() {
        let allocations = calculate_target_allocation(dec!(100), dec!(150));
        let tokens: Vec<&str> = allocations.iter().map(|a| a.token.as_str()).collect();

        assert_eq!(tokens, vec!["CELO", "BTC", "ETH", "DAI", "USDC", "cMC02"]);
        assert_eq!(allocations[0].asset_type, AssetType::CeloNativeAsset);
        assert_eq!(allocations[5].asset_type, AssetType::NaturalCapital);
    }

    #[test]
    fn calls_do_not_share_state() {
        let first = calculate_target_allocation(dec!(100), dec!(250));
        let second = calculate_target_allocation(dec!(100), dec!(150));
        let again = calculate_target_allocation(dec!(100), dec!(250));

        assert_ne!(first, second);
        assert_eq!(first, again);
    }
}
