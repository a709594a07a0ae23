//! Reports answered by the monitor.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use celo_reserve::{ReserveMonitor, SnapshotProvider};
use celo_reserve_core::ConfigLoader;
use serde_json::json;
use tracing::info;

use super::print_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Stables,
    Totals,
    Reserve,
    Ratio,
    Health,
    Custody,
}

pub async fn run_report(kind: ReportKind, config: &Path, snapshot: Option<&Path>) -> Result<()> {
    let snapshot = snapshot.ok_or_else(|| anyhow!("--snapshot is required for this command"))?;
    let monitor = build_monitor(config, snapshot)?;
    let report = render(&monitor, kind).await?;
    print_json(&report)
}

/// Wires a snapshot-backed monitor from a config file.
pub fn build_monitor(config: &Path, snapshot: &Path) -> Result<ReserveMonitor> {
    let config = ConfigLoader::load_from(config)?;
    let provider = Arc::new(SnapshotProvider::from_json_file(snapshot)?);

    info!(
        snapshot = %snapshot.display(),
        stables = config.stables.len(),
        regional = config.regional.len(),
        "Monitor ready"
    );

    Ok(ReserveMonitor::new(
        provider.clone(),
        provider.clone(),
        provider,
        config,
    ))
}

async fn render(monitor: &ReserveMonitor, kind: ReportKind) -> Result<serde_json::Value> {
    let value = match kind {
        ReportKind::Stables => serde_json::to_value(monitor.stables().await?)?,
        ReportKind::Totals => serde_json::to_value(monitor.stable_totals().await?)?,
        ReportKind::Reserve => json!({ "reserve_usd": monitor.total_reserve_usd().await? }),
        ReportKind::Ratio => json!({ "ratio": monitor.backing_ratio().await? }),
        ReportKind::Health => serde_json::to_value(monitor.health().await?)?,
        ReportKind::Custody => {
            let custody = monitor
                .custody_balances()
                .await
                .context("custody balances unavailable")?;
            serde_json::to_value(custody)?
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const SNAPSHOT: &str = r#"{
        "supplies": { "cUSD": 1000.0, "cEUR": 200.0 },
        "floats": [ { "token": "cUSD", "position": "curve-pool", "amount": 100.0 } ],
        "reserve_balance": 42.0,
        "custody": { "custody": 10.0, "frozen": 5.0, "unfrozen": 1.0 },
        "rates": { "USD": 1.0, "EUR": 1.5 },
        "holdings": {
            "celo": {
                "custody": { "token": "CELO", "units": 100.0, "value": 1000.0 },
                "frozen": { "token": "CELO", "units": 50.0, "value": 500.0 },
                "unfrozen": { "token": "CELO", "units": 10.0, "value": 100.0 }
            },
            "otherAssets": [ { "token": "BTC", "units": 0.01, "value": 400.0 } ]
        }
    }"#;

    const CONFIG: &str = r#"
primary_token = "cUSD"
regional = []

[[stables]]
symbol = "cUSD"
iso4217 = "USD"

[[stables]]
symbol = "cEUR"
iso4217 = "EUR"
"#;

    fn monitor(dir: &tempfile::TempDir) -> ReserveMonitor {
        let config = dir.path().join("Reserve.toml");
        let snapshot = dir.path().join("snapshot.json");
        std::fs::write(&config, CONFIG).unwrap();
        std::fs::write(&snapshot, SNAPSHOT).unwrap();
        build_monitor(&config, &snapshot).unwrap()
    }

    #[tokio::test]
    async fn health_report_from_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let monitor = monitor(&dir);

        let report = render(&monitor, ReportKind::Health).await.unwrap();

        // (1000 - 100) * 1.0 + 200 * 1.5; amounts serialize as exact decimal strings
        let outstanding: Decimal = report["outstanding_usd"].as_str().unwrap().parse().unwrap();
        let reserve: Decimal = report["reserve_usd"].as_str().unwrap().parse().unwrap();
        assert_eq!(outstanding, dec!(1200));
        assert_eq!(reserve, dec!(2000));
        assert_eq!(report["targets"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn stables_report_lists_configured_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let monitor = monitor(&dir);

        let report = render(&monitor, ReportKind::Stables).await.unwrap();
        let tokens: Vec<&str> = report
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["token"].as_str().unwrap())
            .collect();

        assert_eq!(tokens, vec!["cUSD", "cEUR"]);
    }

    #[tokio::test]
    async fn missing_snapshot_is_reported() {
        let err = run_report(ReportKind::Totals, Path::new("config/Reserve.toml"), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("--snapshot"));
    }
}
