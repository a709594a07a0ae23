//! Short-lived memoization of external measurements.
//!
//! A miss registers the key as in flight before computing. Callers that find
//! the key in flight subscribe to that computation and receive its outcome,
//! success or failure, so concurrent misses on one key compute once. Settled
//! failures leave nothing behind. Different keys never contend.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::trace;

/// Outcome of one computation, `None` until it settles.
type Outcome<T, E> = Option<Result<T, E>>;

enum Slot<T, E> {
    Ready { value: T, expires_at: Instant },
    InFlight(watch::Receiver<Outcome<T, E>>),
}

enum Lookup<T, E> {
    Hit(T),
    Wait(watch::Receiver<Outcome<T, E>>),
    Compute(watch::Sender<Outcome<T, E>>),
}

/// Process-wide TTL cache keyed by string.
///
/// Unbounded; an expired entry is replaced in place by the next computation.
pub struct TtlCache<T, E> {
    slots: Mutex<HashMap<String, Slot<T, E>>>,
}

impl<T: Clone, E: Clone> TtlCache<T, E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the stored value for `key` while it is younger than its TTL,
    /// otherwise runs `compute` once and stores the result for `ttl`.
    ///
    /// Callers arriving while a computation for `key` is running wait for it
    /// and receive its outcome, failure included.
    ///
    /// # Errors
    ///
    /// Returns whatever error `compute` produced. Nothing is stored in that
    /// case, so the next call runs `compute` again.
    pub async fn get_or_save<F, Fut>(&self, key: &str, compute: F, ttl: Duration) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let tx = loop {
            match self.lookup(key) {
                Lookup::Hit(value) => {
                    trace!(key, "cache hit");
                    return Ok(value);
                }
                Lookup::Wait(mut rx) => {
                    trace!(key, "awaiting in-flight computation");
                    let settled = rx
                        .wait_for(Option::is_some)
                        .await
                        .ok()
                        .and_then(|outcome| outcome.clone());
                    if let Some(outcome) = settled {
                        return outcome;
                    }
                    // Computing caller was dropped before settling; take over.
                }
                Lookup::Compute(tx) => break tx,
            }
        };

        trace!(key, "cache miss");
        let outcome = compute().await;
        self.settle(key, &outcome, ttl);
        tx.send_replace(Some(outcome.clone()));
        outcome
    }

    fn lookup(&self, key: &str) -> Lookup<T, E> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);

        match slots.get(key) {
            Some(Slot::Ready { value, expires_at }) if Instant::now() < *expires_at => {
                return Lookup::Hit(value.clone());
            }
            Some(Slot::InFlight(rx)) if rx.has_changed().is_ok() => {
                return Lookup::Wait(rx.clone());
            }
            _ => {}
        }

        let (tx, rx) = watch::channel(None);
        slots.insert(key.to_string(), Slot::InFlight(rx));
        Lookup::Compute(tx)
    }

    fn settle(&self, key: &str, outcome: &Result<T, E>, ttl: Duration) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);

        match outcome {
            Ok(value) => {
                slots.insert(
                    key.to_string(),
                    Slot::Ready {
                        value: value.clone(),
                        expires_at: Instant::now() + ttl,
                    },
                );
            }
            Err(_) => {
                slots.remove(key);
            }
        }
    }
}

impl<T: Clone, E: Clone> Default for TtlCache<T, E> {
    fn default() -> Self {
        Self::new()
    }
}
