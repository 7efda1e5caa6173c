//! Observation of long running benchmark loops.
//!
//! The driver thread is the single writer of [`Progress`]; it only ever does
//! a relaxed atomic store per iteration. A [`ProgressReporter`] thread reads
//! the snapshot at a fixed cadence and logs it. Neither side takes a lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::CipherSuite;

/// Shared snapshot of one running suite.
#[derive(Debug)]
pub struct Progress {
    provider: String,
    suite: CipherSuite,
    iterations_total: u64,
    iterations_completed: AtomicU64,
    start: Instant,
}

impl Progress {
    /// New snapshot, started now with zero iterations completed.
    pub fn new(provider: &str, suite: CipherSuite, iterations_total: u64) -> Self {
        Progress {
            provider: provider.to_string(),
            suite,
            iterations_total,
            iterations_completed: AtomicU64::new(0),
            start: Instant::now(),
        }
    }

    /// Record completed iterations. Called from the measured loop.
    #[inline]
    pub fn set_completed(&self, n: u64) {
        self.iterations_completed.store(n, Ordering::Relaxed);
    }

    /// Iterations completed so far.
    pub fn completed(&self) -> u64 {
        self.iterations_completed.load(Ordering::Relaxed)
    }

    /// Iterations the loop will run.
    pub fn total(&self) -> u64 {
        self.iterations_total
    }

    /// Provider name.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Suite being measured.
    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Completed fraction in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.iterations_total == 0 {
            return 1.0;
        }
        (self.completed() as f64 / self.iterations_total as f64).min(1.0)
    }

    /// Estimated time left, extrapolated from the elapsed time.
    pub fn eta(&self) -> Option<Duration> {
        let done = self.completed();
        if done == 0 {
            return None;
        }
        let elapsed = self.start.elapsed().as_secs_f64();
        let left = self.iterations_total.saturating_sub(done) as f64;
        Some(Duration::from_secs_f64(elapsed * left / done as f64))
    }
}

/// Background thread logging a [`Progress`] snapshot at a fixed interval.
///
/// Dropping the reporter stops and joins the thread.
#[derive(Debug)]
pub struct ProgressReporter {
    progress: Arc<Progress>,
    stop: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Start reporting on `progress` every `interval`.
    ///
    /// If the thread cannot be spawned the reporter is inert, the snapshot
    /// still works.
    pub fn start(progress: Progress, interval: Duration) -> Self {
        let progress = Arc::new(progress);
        let (tx, rx) = mpsc::channel::<()>();

        let observed = progress.clone();
        let spawned = thread::Builder::new()
            .name("cipherbench-progress".into())
            .spawn(move || loop {
                match rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => report(&observed),
                    // Stop message or the reporter was dropped.
                    _ => break,
                }
            });

        let handle = match spawned {
            Ok(h) => Some(h),
            Err(e) => {
                warn!("Failed to spawn progress thread: {}", e);
                None
            }
        };

        ProgressReporter {
            progress,
            stop: Some(tx),
            handle,
        }
    }

    /// The snapshot the driver writes to.
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Stop the reporter thread and wait for it.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn report(p: &Progress) {
    let eta = p
        .eta()
        .map(|d| format!("{:.1}s", d.as_secs_f64()))
        .unwrap_or_else(|| "-".into());

    info!(
        "[{}/{}] {}/{} iterations ({:.1}%), eta {}",
        p.provider(),
        p.suite(),
        p.completed(),
        p.total(),
        p.fraction() * 100.0,
        eta
    );
}
