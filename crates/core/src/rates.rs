use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// USD price of one unit of each fiat currency, keyed by ISO 4217 code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiatRates(HashMap<String, Decimal>);

impl FiatRates {
    /// Rate for `iso4217`, if the table has one.
    pub fn get(&self, iso4217: &str) -> Option<Decimal> {
        self.0.get(iso4217).copied()
    }
}

impl FromIterator<(String, Decimal)> for FiatRates {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
