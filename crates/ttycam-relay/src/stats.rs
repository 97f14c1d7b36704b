//! Moving-throughput accounting for relayed bytes.
//!
//! All byte-processing calls and the periodic decay tick mutate the counters
//! under a single mutex.  When an interval elapses the current rate is logged
//! and the interval counter restarts; the decay tick feeds zero bytes every
//! second so the reported rate falls back toward zero during silence instead
//! of going stale.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::info;

/// Point-in-time view of the counters, for reporting and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total_bytes: u64,
    pub interval_bytes: u64,
}

#[derive(Debug)]
struct StatsInner {
    total_bytes: u64,
    interval_bytes: u64,
    interval_started: Instant,
}

/// Thread-safe throughput accumulator.
#[derive(Debug)]
pub struct BandwidthStats {
    inner: Mutex<StatsInner>,
    interval: Duration,
    started: Instant,
}

impl BandwidthStats {
    pub fn new(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            inner: Mutex::new(StatsInner {
                total_bytes: 0,
                interval_bytes: 0,
                interval_started: now,
            }),
            interval,
            started: now,
        }
    }

    /// Accounts for `n` relayed bytes and reports the rate once per interval.
    pub fn process_bytes(&self, n: usize) {
        self.process_bytes_at(n, Instant::now());
    }

    fn process_bytes_at(&self, n: usize, now: Instant) {
        let mut inner = self.inner.lock().expect("stats lock poisoned");
        inner.total_bytes += n as u64;
        inner.interval_bytes += n as u64;

        let elapsed = now.saturating_duration_since(inner.interval_started);
        if elapsed > self.interval {
            let rate_kbps = inner.interval_bytes as f64 / elapsed.as_secs_f64() / 1000.0;
            info!("{rate_kbps:.2} KB/s");
            inner.interval_bytes = 0;
            inner.interval_started = now;
        }
    }

    /// Current counter values.
    pub fn snapshot(&self) -> StatsSnapshot {
        let inner = self.inner.lock().expect("stats lock poisoned");
        StatsSnapshot {
            total_bytes: inner.total_bytes,
            interval_bytes: inner.interval_bytes,
        }
    }

    /// Total bytes relayed since startup.
    pub fn total_bytes(&self) -> u64 {
        self.snapshot().total_bytes
    }

    /// Seconds since the accumulator was created.
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Spawns the decay tick: one zero-byte call per second until `running`
/// clears, so the logged rate decays when no traffic arrives.
pub fn spawn_decay_tick(
    stats: Arc<BandwidthStats>,
    running: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(1));
        loop {
            tick.tick().await;
            if !running.load(Ordering::Relaxed) {
                break;
            }
            stats.process_bytes(0);
        }
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
