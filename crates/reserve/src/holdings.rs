//! Reserve totalizer.

use celo_reserve_core::Holdings;
use rust_decimal::Decimal;
use tracing::debug;

/// USD value of the native asset across custody, frozen, and unfrozen states.
#[must_use]
pub fn celo_total_usd(holdings: &Holdings) -> Decimal {
    let celo = &holdings.celo;
    celo.custody.value + celo.frozen.value + celo.unfrozen.value
}

/// USD value of everything the reserve holds.
///
/// Inputs are trusted: a failing holdings source must be handled before this
/// is called.
#[must_use]
pub fn total_reserve_usd(holdings: &Holdings) -> Decimal {
    let celo = celo_total_usd(holdings);
    let other: Decimal = holdings.other_assets.iter().map(|asset| asset.value).sum();
    debug!(celo_usd = %celo, other_usd = %other, "Reserve totalized");
    celo + other
}
