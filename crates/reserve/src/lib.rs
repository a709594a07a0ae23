//! Reserve accounting pipeline.
//!
//! Pulls independently failing measurements (token supplies, reserve-owned
//! float, fiat rates, holdings), reconciles them into per-token records and
//! aggregate totals, and turns those totals into a target allocation.
//!
//! - `cache`: short-lived memoization of external calls, one computation in flight per key
//! - `supply`: cached, deadline-bounded chain measurements
//! - `stables`: reconciliation of supplies into `TokenModel` records
//! - `holdings`: reserve totalizer
//! - `targets`: deterministic target allocation policy
//! - `monitor`: the facade a presentation layer calls

pub mod cache;
pub mod error;
pub mod holdings;
pub mod monitor;
pub mod snapshot;
pub mod stables;
pub mod supply;
pub mod targets;

pub use cache::TtlCache;
pub use error::ReserveError;
pub use monitor::{ReserveHealth, ReserveMonitor};
pub use snapshot::SnapshotProvider;
pub use stables::StableTotals;
pub use supply::SupplyCollector;
pub use targets::{calculate_target_allocation, ClassTargets};
