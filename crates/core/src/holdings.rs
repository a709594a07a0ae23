//! Reserve-side inputs: custody balances, valued holdings, and the on-chain
//! positions where the reserve keeps float of its own stable token.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Native asset units in each custody state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CustodyBalances {
    pub custody: Decimal,
    pub frozen: Decimal,
    pub unfrozen: Decimal,
}

impl CustodyBalances {
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.custody + self.frozen + self.unfrozen
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetHolding {
    pub token: String,
    pub units: Decimal,
    /// USD value of `units`.
    pub value: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CeloHoldings {
    pub custody: AssetHolding,
    pub frozen: AssetHolding,
    pub unfrozen: AssetHolding,
}

/// Everything the reserve holds, already valued in USD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holdings {
    pub celo: CeloHoldings,
    #[serde(default)]
    pub other_assets: Vec<AssetHolding>,
}

/// A place where the reserve holds units of the primary stable token.
///
/// Those units are already minted but are not external liabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FloatPosition {
    /// Reserve liquidity sitting in the Curve pool.
    CurvePool,
    /// Balance of the reserve multisig.
    ReserveMultisig,
    /// Uniswap V3 positions owned by the reserve multisig.
    UniswapV3,
}

impl FloatPosition {
    pub const ALL: [Self; 3] = [Self::CurvePool, Self::ReserveMultisig, Self::UniswapV3];
}

impl fmt::Display for FloatPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurvePool => write!(f, "curve-pool"),
            Self::ReserveMultisig => write!(f, "reserve-multisig"),
            Self::UniswapV3 => write!(f, "uniswap-v3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn custody_total_sums_all_states() {
        let balances = CustodyBalances {
            custody: dec!(10),
            frozen: dec!(2.5),
            unfrozen: dec!(7.5),
        };
        assert_eq!(balances.total(), dec!(20));
    }

    #[test]
    fn holdings_parse_without_other_assets() {
        let json = r#"{
            "celo": {
                "custody": {"token": "CELO", "units": 1.0, "value": 0.5},
                "frozen": {"token": "CELO", "units": 2.0, "value": 1.0},
                "unfrozen": {"token": "CELO", "units": 3.0, "value": 1.5}
            }
        }"#;
        let holdings: Holdings = serde_json::from_str(json).unwrap();
        assert!(holdings.other_assets.is_empty());
        assert_eq!(holdings.celo.unfrozen.value, dec!(1.5));
    }

    #[test]
    fn float_position_display_matches_serde() {
        for position in FloatPosition::ALL {
            let json = serde_json::to_string(&position).unwrap();
            assert_eq!(json, format!("\"{position}\""));
        }
    }
}
