use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::{BenchError, CipherSuite};

/// Result of benchmarking one (provider, suite, size).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    /// Round trip validated. Throughput in bytes per second.
    Rate(f64),
    /// The provider does not support the suite. Not a failure.
    Skipped(BenchError),
    /// Configuration, transform or validation failed.
    Failed(BenchError),
}

/// Report for one cipher suite of a provider run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    /// Provider display name.
    pub provider: String,
    /// Suite measured.
    pub suite: CipherSuite,
    /// Message size in bytes.
    pub message_size: usize,
    /// Iterations requested.
    pub iterations: u64,
    /// Iterations that completed both encrypt and decrypt.
    pub completed: u64,
    /// Wall clock time of the measured loop.
    pub elapsed: Duration,
    /// What happened.
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl SuiteReport {
    /// Throughput, if the suite validated.
    pub fn rate(&self) -> Option<f64> {
        match self.outcome {
            Outcome::Rate(r) => Some(r),
            _ => None,
        }
    }

    /// Whether this suite counts against the run's exit status.
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }
}

/// Report for one provider at one message size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderReport {
    /// Provider display name.
    pub provider: String,
    /// Message size in bytes.
    pub message_size: usize,
    /// Set when the provider could not be initialized or produce input.
    /// No suites were attempted.
    pub error: Option<BenchError>,
    /// One report per attempted suite, in enumeration order.
    pub suites: Vec<SuiteReport>,
}

impl ProviderReport {
    pub(crate) fn new(provider: &str, message_size: usize) -> Self {
        ProviderReport {
            provider: provider.to_string(),
            message_size,
            error: None,
            suites: Vec::new(),
        }
    }

    /// True if initialization worked and no suite failed. Skips are fine.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && !self.suites.iter().any(SuiteReport::is_failure)
    }

    /// Suites that produced a rate.
    pub fn rates(&self) -> impl Iterator<Item = &SuiteReport> {
        self.suites.iter().filter(|s| s.rate().is_some())
    }

    /// Nothing to report: no error and no suite attempted. Displays as an empty string.
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.suites.is_empty()
    }
}

/// Everything a [`Bench::run`](crate::Bench::run) produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Provider reports in run order (sizes outer, providers inner).
    pub providers: Vec<ProviderReport>,
}

impl RunReport {
    /// True if every attempted, non-skipped combination validated.
    pub fn is_success(&self) -> bool {
        self.providers.iter().all(ProviderReport::is_success)
    }

    /// All suite reports that produced a rate.
    pub fn rates(&self) -> impl Iterator<Item = &SuiteReport> {
        self.providers.iter().flat_map(ProviderReport::rates)
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Rate(r) => write!(
                f,
                "[{}/{}] size: {} bytes, rate: {} bytes/sec",
                self.provider,
                self.suite,
                self.message_size,
                Grouped(*r)
            ),
            Outcome::Skipped(e) => write!(
                f,
                "[{}] failed to set {}, skipping it: {}",
                self.provider, self.suite, e
            ),
            Outcome::Failed(e) => write!(
                f,
                "[{}/{}] {} failed: {}",
                self.provider,
                self.suite,
                e.stage(),
                e.detail()
            ),
        }
    }
}

impl fmt::Display for ProviderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(e) = &self.error {
            return write!(
                f,
                "[{}] {} failed: {}",
                self.provider,
                e.stage(),
                e.detail()
            );
        }
        for (i, s) in self.suites.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", s)?;
        }
        Ok(())
    }
}

/// Two decimals with thousands separators, e.g. `1,234,567.89`.
struct Grouped(f64);

impl fmt::Display for Grouped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.0.is_finite() {
            return write!(f, "{}", self.0);
        }

        let s = format!("{:.2}", self.0.abs());
        let (int, frac) = s.split_once('.').unwrap_or((&s, "00"));

        if self.0 < 0.0 {
            write!(f, "-")?;
        }
        for (i, c) in int.chars().enumerate() {
            if i > 0 && (int.len() - i) % 3 == 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ".{}", frac)
    }
}
