use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

pub const DEFAULT_CALLS_PER_MINUTE: u32 = 10;

const NANOS_PER_MINUTE: u64 = 60_000_000_000;

/// Minimum-interval gate in front of external company lookups.
///
/// Enforces a gap of `60s / calls_per_minute` between the return of one
/// `wait()` and the return of the next. This is a single-slot throttle,
/// not a token bucket: there is no burst allowance.
///
/// The lock is held across the sleep, so concurrent callers queue up and
/// each one observes the full gap after its predecessor.
///
/// # Example
///
/// ```rust,no_run
/// use leadgen_pro::rate_limiter::EnrichmentGate;
/// use std::sync::Arc;
///
/// # async fn run() {
/// let gate = Arc::new(EnrichmentGate::new(10));
/// gate.wait().await; // returns immediately
/// gate.wait().await; // returns ~6s later
/// # }
/// ```
#[derive(Debug)]
pub struct EnrichmentGate {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Default for EnrichmentGate {
    fn default() -> Self {
        Self::new(DEFAULT_CALLS_PER_MINUTE)
    }
}

impl EnrichmentGate {
    /// Creates a gate admitting at most `calls_per_minute` passes per minute.
    ///
    /// A rate of zero is treated as one call per minute. The interval is
    /// rounded up to the next nanosecond so it is never shorter than
    /// `60000 / calls_per_minute` ms.
    pub fn new(calls_per_minute: u32) -> Self {
        let calls = u64::from(calls_per_minute.max(1));
        Self {
            min_interval: Duration::from_nanos(NANOS_PER_MINUTE.div_ceil(calls)),
            last_call: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Suspends until the minimum interval since the previous pass has elapsed,
    /// then records this pass as the new reference point.
    pub async fn wait(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                tracing::debug!(
                    "Enrichment gate holding for {}ms",
                    remaining.as_millis()
                );
                tokio::time::sleep(remaining).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}
