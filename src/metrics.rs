use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use once_cell::sync::Lazy;

/// Global runtime metrics for the poller.
///
/// Purpose:
/// - Track completed polling cycles
/// - Track fetch throughput (spawned / succeeded)
/// - Track failures per classification
///
/// Design:
/// - Lock-free (Atomics)
/// - Cheap to update
/// - Safe in async + multithreaded contexts
#[derive(Default)]
pub struct RuntimeMetrics {
    // High-level
    pub cycles_completed: AtomicUsize,

    // Fetch level
    pub fetchers_spawned: AtomicUsize,
    pub quotes_collected: AtomicUsize,

    // Failures by classification
    pub exchange_unavailable: AtomicUsize,
    pub request_timeouts: AtomicUsize,
    pub unsupported_pairs: AtomicUsize,
    pub other_errors: AtomicUsize,
}

/// Global metrics registry (singleton)
pub static METRICS: Lazy<Arc<RuntimeMetrics>> =
    Lazy::new(|| Arc::new(RuntimeMetrics::default()));
