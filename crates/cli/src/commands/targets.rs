//! Target allocation calculator.
//!
//! Evaluates the allocation policy for totals given on the command line.
//! Nothing is fetched, so this works without a snapshot.

use anyhow::{bail, Result};
use celo_reserve::calculate_target_allocation;
use celo_reserve_core::Allocation;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::print_json;

/// Arguments for the targets command.
#[derive(Args, Debug, Clone)]
pub struct TargetsArgs {
    /// Outstanding stable value in USD
    #[arg(long)]
    pub outstanding: Decimal,

    /// Reserve value in USD
    #[arg(long)]
    pub reserve: Decimal,
}

#[derive(Debug, Serialize)]
struct TargetsReport {
    /// `None` when nothing is outstanding.
    ratio: Option<Decimal>,
    targets: Vec<Allocation>,
}

pub fn run_targets(args: &TargetsArgs) -> Result<()> {
    let report = targets_report(args)?;
    info!(ratio = ?report.ratio, "Target allocation calculated");
    print_json(&report)
}

fn targets_report(args: &TargetsArgs) -> Result<TargetsReport> {
    if args.outstanding.is_sign_negative() || args.reserve.is_sign_negative() {
        bail!("totals must not be negative");
    }

    Ok(TargetsReport {
        ratio: args.reserve.checked_div(args.outstanding),
        targets: calculate_target_allocation(args.outstanding, args.reserve),
    })
}
