use std::sync::atomic::{AtomicI64, Ordering};

/// Outcome of [`RateGate::try_acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Rejected { wait_ms: u64 },
}

impl GateDecision {
    /// Remaining wait rounded up to whole seconds, as reported to callers.
    pub fn wait_secs(&self) -> Option<u64> {
        match self {
            GateDecision::Allowed => None,
            GateDecision::Rejected { wait_ms } => Some(wait_ms.div_ceil(1000)),
        }
    }
}

/// Process-wide throttle shared by every caller.
///
/// Remembers only the time of the last accepted request. A request is accepted
/// when at least `min_interval_ms` has passed since then; a rejected request
/// leaves the timestamp untouched. The timestamp is swapped with
/// compare-and-exchange, so of two requests racing on the same stale value only
/// one is accepted.
#[derive(Debug)]
pub struct RateGate {
    min_interval_ms: u64,
    last_request_ms: AtomicI64,
}

impl RateGate {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval_ms,
            last_request_ms: AtomicI64::new(0),
        }
    }

    pub fn min_interval_ms(&self) -> u64 {
        self.min_interval_ms
    }

    /// `now_ms` is milliseconds since the Unix epoch.
    pub fn try_acquire(&self, now_ms: i64) -> GateDecision {
        let mut last = self.last_request_ms.load(Ordering::Acquire);
        loop {
            // A clock stepping backwards counts as no time having passed.
            let elapsed = now_ms.saturating_sub(last).max(0) as u64;
            if elapsed < self.min_interval_ms {
                return GateDecision::Rejected {
                    wait_ms: self.min_interval_ms - elapsed,
                };
            }

            match self.last_request_ms.compare_exchange_weak(
                last,
                now_ms,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return GateDecision::Allowed,
                Err(current) => last = current,
            }
        }
    }

    pub fn last_request_ms(&self) -> i64 {
        self.last_request_ms.load(Ordering::Acquire)
    }
}

/// Source of "now" for the gate.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
