use std::time::{Duration, Instant};

use crate::crypto::{CipherInstance, Provider};
use crate::progress::{Progress, ProgressReporter};
use crate::report::{Outcome, ProviderReport, RunReport, SuiteReport};
use crate::{validate, BenchConfig, BenchError, CipherSuite};

/// Floor for the measured time so a rate is always finite.
const MIN_ELAPSED_SECS: f64 = 1e-9;

/// The benchmark driver.
///
/// Runs every provider through the same protocol: initialize once, generate
/// one random plaintext, then for each cipher suite configure, run the timed
/// encrypt/decrypt loop, validate the round trip and compute a rate.
///
/// ```no_run
/// use cipherbench::{crypto, BenchConfig};
///
/// let bench = BenchConfig::new().set_iterations(1000).build().unwrap();
/// let report = bench.run(&crypto::providers_from_feature_flags());
///
/// for line in report.rates() {
///     println!("{}", line);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Bench {
    config: BenchConfig,
}

impl Bench {
    /// Create a driver. Fails with [`BenchError::Config`] for an unrunnable config.
    pub fn new(config: BenchConfig) -> Result<Self, BenchError> {
        config.validate()?;
        Ok(Bench { config })
    }

    /// The config this driver runs with.
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Run every configured message size against every provider.
    pub fn run(&self, providers: &[&dyn Provider]) -> RunReport {
        self.run_each(providers, |_| {})
    }

    /// Like [`Bench::run`], calling `on_report` as soon as each provider finishes.
    pub fn run_each<F>(&self, providers: &[&dyn Provider], mut on_report: F) -> RunReport
    where
        F: FnMut(&ProviderReport),
    {
        let mut run = RunReport::default();

        for &message_size in self.config.message_sizes() {
            for provider in providers {
                let report = self.run_provider(*provider, message_size);
                on_report(&report);
                run.providers.push(report);
            }
        }

        run
    }

    /// Benchmark all suites of one provider at one message size.
    ///
    /// An init failure aborts this provider only. Suite failures are recorded
    /// and enumeration continues.
    pub fn run_provider(&self, provider: &dyn Provider, message_size: usize) -> ProviderReport {
        let name = provider.name();
        let iterations = self.config.iterations_for(message_size);
        let mut report = ProviderReport::new(name, message_size);

        let mut instance = match provider.init() {
            Ok(v) => v,
            Err(e) => {
                error!("[{}] initialization failed: {}", name, e.detail());
                report.error = Some(e);
                return report;
            }
        };
        debug!(
            "[{}] initialized, size: {} bytes, iterations: {}",
            name, message_size, iterations
        );

        // Both buffers live for the whole provider run and are shared by all suites.
        let mut src = vec![0; message_size];
        let mut dst = vec![0; provider.buffer_size(message_size)];

        if let Err(e) = instance.random(&mut src) {
            error!("[{}] input randomization failed: {}", name, e.detail());
            report.error = Some(e);
            instance.free();
            return report;
        }

        for &suite in provider.cipher_suites() {
            if !self.config.includes(suite) {
                trace!("[{}] {} filtered out", name, suite);
                continue;
            }

            let suite_report = self.run_suite(name, instance.as_mut(), suite, &src, &mut dst);
            report.suites.push(suite_report);
        }

        instance.free();
        debug!("[{}] freed", name);

        report
    }

    fn run_suite(
        &self,
        name: &str,
        instance: &mut dyn CipherInstance,
        suite: CipherSuite,
        src: &[u8],
        dst: &mut [u8],
    ) -> SuiteReport {
        let message_size = src.len();
        let iterations = self.config.iterations_for(message_size);

        let mut report = SuiteReport {
            provider: name.to_string(),
            suite,
            message_size,
            iterations,
            completed: 0,
            elapsed: Duration::ZERO,
            outcome: Outcome::Rate(0.0),
        };

        if let Err(e) = instance.set_cipher(suite) {
            if e.is_skip() {
                warn!("[{}] failed to set {}, skipping it: {}", name, suite, e);
                report.outcome = Outcome::Skipped(e);
            } else {
                error!(
                    "[{}/{}] {} failed: {}",
                    name,
                    suite,
                    e.stage(),
                    e.detail()
                );
                report.outcome = Outcome::Failed(e);
            }
            return report;
        }

        let reporter = self
            .config
            .progress_interval()
            .map(|interval| ProgressReporter::start(Progress::new(name, suite, iterations), interval));
        let progress = reporter.as_ref().map(ProgressReporter::progress);

        let (completed, elapsed, failure) = timed_loop(instance, iterations, src, dst, progress);

        drop(reporter);

        report.completed = completed;
        report.elapsed = elapsed;

        let validation = validate(message_size, dst, src);

        report.outcome = match (failure, validation) {
            (Some(e), validation) => {
                error!(
                    "[{}/{}] {} failed after {} of {} iterations: {}",
                    name,
                    suite,
                    e.stage(),
                    completed,
                    iterations,
                    e.detail()
                );
                if let Err(v) = validation {
                    error!("[{}/{}] {}", name, suite, v);
                }
                Outcome::Failed(e)
            }
            (None, Err(e)) => {
                error!("[{}/{}] {}, encryption/decryption failure!", name, suite, e);
                Outcome::Failed(e)
            }
            (None, Ok(())) => {
                let rate = rate(iterations, message_size, elapsed);
                info!(
                    "[{}/{}] size: {} bytes, rate: {:.2} bytes/sec",
                    name, suite, message_size, rate
                );
                Outcome::Rate(rate)
            }
        };

        report
    }
}

/// The measured region. Nothing in here may block, log or allocate.
fn timed_loop(
    instance: &mut dyn CipherInstance,
    iterations: u64,
    src: &[u8],
    dst: &mut [u8],
    progress: Option<&Progress>,
) -> (u64, Duration, Option<BenchError>) {
    let mut completed = 0;
    let mut failure = None;

    let start = Instant::now();

    for _ in 0..iterations {
        let len = match instance.encrypt(src, dst) {
            Ok(v) => v,
            Err(e) => {
                failure = Some(e);
                break;
            }
        };

        if let Err(e) = instance.decrypt_in_place(dst, len) {
            failure = Some(e);
            break;
        }

        completed += 1;

        if let Some(p) = progress {
            p.set_completed(completed);
        }
    }

    (completed, start.elapsed(), failure)
}

/// Bytes per second, counting one encrypt/decrypt pair as `message_size` bytes.
fn rate(iterations: u64, message_size: usize, elapsed: Duration) -> f64 {
    let bytes = iterations as f64 * message_size as f64;
    bytes / elapsed.as_secs_f64().max(MIN_ELAPSED_SECS)
}
