//! Envelope wrapping every external measurement.
//!
//! A measurement either succeeded (`Measurement`) or failed (`ProviderFailure`).
//! Both sides carry the provider that answered and the time of the answer, so a
//! consumer has to branch on the outcome before it can touch a value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Where a measurement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderSource {
    /// Public Celo RPC node.
    Forno,
    /// Fiat exchange rate service.
    ExchangeRates,
    /// Off-chain custodian / holdings report.
    Custodian,
    /// Recorded snapshot file.
    Snapshot,
}

impl fmt::Display for ProviderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forno => write!(f, "forno"),
            Self::ExchangeRates => write!(f, "exchange-rates"),
            Self::Custodian => write!(f, "custodian"),
            Self::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// A successful measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement<T> {
    pub value: T,
    pub provider: ProviderSource,
    pub time: DateTime<Utc>,
}

impl<T> Measurement<T> {
    /// Stamps `value` with the current time.
    pub fn new(value: T, provider: ProviderSource) -> Self {
        Self {
            value,
            provider,
            time: Utc::now(),
        }
    }
}

/// A failed measurement. Never carries a value.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{provider} measurement failed: {cause}")]
pub struct ProviderFailure {
    pub provider: ProviderSource,
    pub cause: String,
    pub time: DateTime<Utc>,
}

impl ProviderFailure {
    pub fn new(provider: ProviderSource, cause: impl fmt::Display) -> Self {
        Self {
            provider,
            cause: cause.to_string(),
            time: Utc::now(),
        }
    }

    /// Failure recorded when a call did not answer within `after`.
    pub fn timed_out(provider: ProviderSource, after: Duration) -> Self {
        Self::new(provider, format!("no answer within {}ms", after.as_millis()))
    }
}

pub type ProviderResult<T> = Result<Measurement<T>, ProviderFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_display_names_provider() {
        let failure = ProviderFailure::new(ProviderSource::Forno, "connection reset");
        assert_eq!(
            failure.to_string(),
            "forno measurement failed: connection reset"
        );
    }

    #[test]
    fn timed_out_reports_deadline() {
        let failure = ProviderFailure::timed_out(ProviderSource::Custodian, Duration::from_secs(2));
        assert!(failure.cause.contains("2000ms"));
    }

    #[test]
    fn source_serializes_kebab_case() {
        let json = serde_json::to_string(&ProviderSource::ExchangeRates).unwrap();
        assert_eq!(json, "\"exchange-rates\"");
    }
}
