//! Request metrics for the bridge server
//!
//! Lightweight, thread-safe counters surfaced through `GET /health`.
//! Tracks request latencies with percentile calculations (p50, p95, p99),
//! slow-request detection, and per-handler-type counts. All hot-path
//! updates are atomic increments plus bounded buffer pushes; nothing here
//! grows with uptime.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use serde::Serialize;

/// Rolling window of recent request latencies used for percentiles.
const LATENCY_WINDOW_SIZE: usize = 1000;

/// Only the most recent slow requests are kept.
const MAX_SLOW_REQUESTS: usize = 10;

/// Requests taking at least this long are tracked as slow.
pub const SLOW_REQUEST_THRESHOLD_MS: u64 = 100;

/// Thread-safe request metrics collector.
///
/// One instance per server, shared (via `Arc`) between the HTTP adapter
/// and the health endpoint.
pub struct Metrics {
    /// Total requests dispatched
    request_count: AtomicU64,

    /// Requests that ended in a dispatch error
    failure_count: AtomicU64,

    /// Requests at or above SLOW_REQUEST_THRESHOLD_MS
    slow_request_count: AtomicU64,

    /// Rolling window of recent latencies for percentile calculation
    latencies_ms: Mutex<VecDeque<u64>>,

    /// Sum of the latencies currently in the window
    latency_sum_ms: AtomicU64,

    /// Request count and latency sum per handler type. Handler types are
    /// registry-defined, so this cannot be a fixed set of counters.
    per_handler: Mutex<HashMap<String, HandlerCounter>>,

    /// Most recent slow requests
    slow_requests: Mutex<VecDeque<SlowRequest>>,

    /// When collection started
    started_at: Instant,
}

#[derive(Default)]
struct HandlerCounter {
    count: u64,
    latency_sum_ms: u64,
}

/// A recorded slow request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SlowRequest {
    /// The compound operation path, e.g. `"dictionary_put"`
    pub operation: String,
    pub duration_ms: u64,
    /// Milliseconds since metrics collection started
    pub timestamp_ms: u64,
}

/// Point-in-time copy of all metrics, serialized into `/health`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MetricsSnapshot {
    pub request_count: u64,
    pub failure_count: u64,
    pub slow_request_count: u64,
    pub latency_p50_ms: u64,
    pub latency_p95_ms: u64,
    pub latency_p99_ms: u64,
    pub latency_avg_ms: u64,
    pub top_slow_requests: Vec<SlowRequest>,
    pub handler_stats: Vec<HandlerStat>,
    pub uptime_secs: u64,
}

/// Per-handler-type statistics.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HandlerStat {
    pub handler_type: String,
    pub count: u64,
    pub avg_ms: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            request_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            slow_request_count: AtomicU64::new(0),
            latencies_ms: Mutex::new(VecDeque::with_capacity(LATENCY_WINDOW_SIZE)),
            latency_sum_ms: AtomicU64::new(0),
            per_handler: Mutex::new(HashMap::new()),
            slow_requests: Mutex::new(VecDeque::with_capacity(MAX_SLOW_REQUESTS)),
            started_at: Instant::now(),
        }
    }

    /// Record a dispatched request.
    ///
    /// * `operation` - compound path as received, e.g. `"database_create"`
    /// * `handler_type` - namespace component of the path
    /// * `duration_ms` - wall time of the dispatch
    /// * `ok` - whether dispatch succeeded
    pub fn record_request(
        &self,
        operation: &str,
        handler_type: &str,
        duration_ms: u64,
        ok: bool,
    ) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.failure_count.fetch_add(1, Ordering::Relaxed);
        }

        {
            let mut per_handler = self.per_handler.lock().unwrap();
            let counter = per_handler.entry(handler_type.to_string()).or_default();
            counter.count += 1;
            counter.latency_sum_ms += duration_ms;
        }

        {
            let mut latencies = self.latencies_ms.lock().unwrap();
            if latencies.len() >= LATENCY_WINDOW_SIZE {
                if let Some(old) = latencies.pop_front() {
                    self.latency_sum_ms.fetch_sub(old, Ordering::Relaxed);
                }
            }
            latencies.push_back(duration_ms);
            self.latency_sum_ms.fetch_add(duration_ms, Ordering::Relaxed);
        }

        if duration_ms >= SLOW_REQUEST_THRESHOLD_MS {
            self.slow_request_count.fetch_add(1, Ordering::Relaxed);

            let mut slow = self.slow_requests.lock().unwrap();
            if slow.len() >= MAX_SLOW_REQUESTS {
                slow.pop_front();
            }
            slow.push_back(SlowRequest {
                operation: operation.to_string(),
                duration_ms,
                timestamp_ms: self.started_at.elapsed().as_millis() as u64,
            });
        }
    }

    /// Point-in-time snapshot. O(window size) for the percentile sort;
    /// runs only on health requests, never per-dispatch.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let (p50, p95, p99, avg) = {
            let latencies = self.latencies_ms.lock().unwrap();
            if latencies.is_empty() {
                (0, 0, 0, 0)
            } else {
                let mut sorted: Vec<u64> = latencies.iter().copied().collect();
                sorted.sort_unstable();

                let len = sorted.len();
                let p50 = sorted[len * 50 / 100];
                let p95 = sorted[(len * 95 / 100).min(len - 1)];
                let p99 = sorted[(len * 99 / 100).min(len - 1)];
                let avg = self.latency_sum_ms.load(Ordering::Relaxed) / len as u64;
                (p50, p95, p99, avg)
            }
        };

        let handler_stats = {
            let per_handler = self.per_handler.lock().unwrap();
            let mut stats: Vec<HandlerStat> = per_handler
                .iter()
                .map(|(handler_type, counter)| HandlerStat {
                    handler_type: handler_type.clone(),
                    count: counter.count,
                    avg_ms: if counter.count > 0 {
                        counter.latency_sum_ms / counter.count
                    } else {
                        0
                    },
                })
                .collect();
            stats.sort_by(|a, b| b.count.cmp(&a.count));
            stats
        };

        let top_slow_requests = {
            let slow = self.slow_requests.lock().unwrap();
            slow.iter().cloned().collect()
        };

        MetricsSnapshot {
            request_count: self.request_count.load(Ordering::Relaxed),
            failure_count: self.failure_count.load(Ordering::Relaxed),
            slow_request_count: self.slow_request_count.load(Ordering::Relaxed),
            latency_p50_ms: p50,
            latency_p95_ms: p95,
            latency_p99_ms: p99,
            latency_avg_ms: avg,
            top_slow_requests,
            handler_stats,
            uptime_secs: self.started_at.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
