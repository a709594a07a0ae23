use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Reconciled circulating amount and fiat value of one stable token.
///
/// A failed record never carries partial numbers: `units`, `value` and
/// `updated` are all `None` whenever `has_error` is set. The constructors are
/// the only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenModel {
    token: String,
    units: Option<Decimal>,
    value: Option<Decimal>,
    updated: Option<DateTime<Utc>>,
    has_error: bool,
}

impl TokenModel {
    #[must_use]
    pub fn reconciled(token: impl Into<String>, units: Decimal, value: Decimal, updated: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            units: Some(units),
            value: Some(value),
            updated: Some(updated),
            has_error: false,
        }
    }

    #[must_use]
    pub fn failed(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            units: None,
            value: None,
            updated: None,
            has_error: true,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn units(&self) -> Option<Decimal> {
        self.units
    }

    /// Fiat (USD) value, `None` for failed records.
    pub fn value(&self) -> Option<Decimal> {
        self.value
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }
}
