use thiserror::Error;

/// Failures that abort a whole aggregation pass.
///
/// Per-token measurement failures never show up here; they are folded into
/// failed `TokenModel` records instead.
#[derive(Error, Debug, Clone)]
pub enum ReserveError {
    /// Without rates no token can be valued.
    #[error("fiat rate lookup failed: {0}")]
    Rates(String),

    #[error("no fiat rate for {currency} (needed by {token})")]
    MissingRate { currency: String, token: String },

    #[error("reserve holdings lookup failed: {0}")]
    Holdings(String),
}
