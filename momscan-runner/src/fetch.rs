//! Deadline-bounded retrieval.
//!
//! `PriceSource::fetch` is blocking and may hang on a slow network. The fetch
//! runs on a detached worker thread; the caller waits on a channel for at most
//! the deadline. On expiry the worker is abandoned (its result is dropped when
//! it eventually finishes) and the caller gets `DataError::Timeout`.
//!
//! Calls into the source are bounded by a `FetchLimiter`. The worker holds its
//! permit until `fetch` returns, so an abandoned fetch still counts against the
//! bound and a hanging provider never sees more than `capacity` requests.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use momscan_core::data::{DataError, LookbackPeriod, PriceSource};
use momscan_core::domain::PriceSeries;

/// Counting limiter on in-flight source calls.
#[derive(Debug, Clone)]
pub struct FetchLimiter {
    inner: Arc<LimiterState>,
}

#[derive(Debug)]
struct LimiterState {
    available: Mutex<usize>,
    released: Condvar,
}

impl LimiterState {
    fn lock(&self) -> MutexGuard<'_, usize> {
        // A poisoned count is still a valid count.
        self.available.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Held while a source call is in flight; releases on drop.
#[derive(Debug)]
pub struct FetchPermit {
    inner: Arc<LimiterState>,
}

impl Drop for FetchPermit {
    fn drop(&mut self) {
        *self.inner.lock() += 1;
        self.inner.released.notify_one();
    }
}

impl FetchLimiter {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(LimiterState {
                available: Mutex::new(capacity),
                released: Condvar::new(),
            }),
        }
    }

    /// Wait until a permit is free or `deadline` passes.
    pub fn acquire_until(&self, deadline: Instant) -> Option<FetchPermit> {
        let mut available = self.inner.lock();
        while *available == 0 {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            if remaining.is_zero() {
                return None;
            }
            available = self
                .inner
                .released
                .wait_timeout(available, remaining)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|e| e.into_inner().0);
        }
        *available -= 1;
        Some(FetchPermit {
            inner: Arc::clone(&self.inner),
        })
    }

    /// Permits not currently held.
    pub fn available(&self) -> usize {
        *self.inner.lock()
    }
}

/// Fetch `identifier` from `source`, giving up after `timeout`.
///
/// The deadline covers waiting for a permit as well as the call itself.
pub fn fetch_with_timeout(
    source: Arc<dyn PriceSource>,
    identifier: &str,
    lookback: LookbackPeriod,
    timeout: Duration,
    limiter: &FetchLimiter,
) -> Result<PriceSeries, DataError> {
    let deadline = Instant::now() + timeout;
    let timed_out = || {
        tracing::warn!(identifier, timeout_secs = timeout.as_secs(), "fetch timed out");
        DataError::Timeout {
            symbol: identifier.to_string(),
            timeout_secs: timeout.as_secs(),
        }
    };

    let Some(permit) = limiter.acquire_until(deadline) else {
        tracing::debug!(identifier, "no fetch permit before deadline");
        return Err(timed_out());
    };

    let (tx, rx) = mpsc::channel();
    let owned_id = identifier.to_string();

    std::thread::Builder::new()
        .name(format!("fetch-{identifier}"))
        .spawn(move || {
            let result = source.fetch(&owned_id, &lookback);
            drop(permit);
            // The receiver may be gone after a timeout; nothing to do then.
            let _ = tx.send(result);
        })
        .map_err(|e| DataError::Other(format!("failed to spawn fetch thread: {e}")))?;

    let remaining = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(remaining) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(timed_out()),
        Err(RecvTimeoutError::Disconnected) => Err(DataError::Other(format!(
            "fetch worker for {identifier} exited without a result"
        ))),
    }
}
