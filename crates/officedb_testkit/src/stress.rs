//! Stress tests for officedb.
//!
//! These helpers hammer one store from several threads and report how many
//! operations succeeded. Callers verify the resulting state separately.

use officedb_core::{Article, Database};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        Self {
            total_ops: successful + failed,
            successful_ops: successful,
            failed_ops: failed,
            duration,
        }
    }

    /// Operations per second.
    pub fn ops_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.total_ops as f64 / secs
        } else {
            0.0
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {name} ===");
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second());
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Operations per thread.
    pub operations: usize,
    /// Number of concurrent threads.
    pub threads: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 50,
            threads: 4,
        }
    }
}

/// Runs `op(thread)` on `threads` threads; `op` returns how many of its
/// `operations` succeeded.
fn run_threads(
    threads: usize,
    operations: usize,
    op: impl Fn(usize) -> usize + Sync,
) -> StressTestResult {
    let successful = AtomicUsize::new(0);
    let start = Instant::now();

    thread::scope(|s| {
        for t in 0..threads {
            let op = &op;
            let successful = &successful;
            s.spawn(move || {
                successful.fetch_add(op(t), Ordering::Relaxed);
            });
        }
    });

    let successful = successful.into_inner();
    StressTestResult::new(successful, threads * operations - successful, start.elapsed())
}

/// Every thread saves its own range of article ids, one save per call.
///
/// Thread `t` writes ids `1000 + t * operations ..`; the ranges never
/// overlap, so a correct store ends up with `threads * operations`
/// articles.
pub fn stress_concurrent_article_saves(db: &Database, config: &StressConfig) -> StressTestResult {
    let operations = config.operations;
    run_threads(config.threads, operations, |t| {
        (0..operations)
            .filter(|i| {
                let id = 1000 + t * operations + i;
                db.save_article(&Article::new(id.to_string(), format!("Thread {t} item {i}")))
                    .is_ok()
            })
            .count()
    })
}

/// Every thread claims article ids; returns all claimed ids.
pub fn stress_concurrent_claims(
    db: &Database,
    config: &StressConfig,
) -> (StressTestResult, Vec<u64>) {
    let claimed = Mutex::new(Vec::new());
    let operations = config.operations;
    let result = run_threads(config.threads, operations, |_| {
        (0..operations)
            .filter(|_| match db.claim_next_article_id() {
                Ok(id) => {
                    claimed.lock().push(id);
                    true
                }
                Err(_) => false,
            })
            .count()
    });
    (result, claimed.into_inner())
}
