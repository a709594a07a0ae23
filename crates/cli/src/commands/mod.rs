pub mod report;
pub mod targets;

pub use report::{run_report, ReportKind};
pub use targets::{run_targets, TargetsArgs};

use serde::Serialize;

/// Writes `value` to stdout as pretty JSON.
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
