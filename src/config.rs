use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Bench, BenchError, CipherSuite};

/// Default message sizes in bytes.
pub const DEFAULT_MESSAGE_SIZES: &[usize] = &[64, 512, 1024];

/// Default byte budget per (provider, size): one million 4 KiB messages.
pub const DEFAULT_ITERATION_BUDGET: u64 = 1_000_000 * 4096;

/// How many encrypt/decrypt cycles to run for a message size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Iterations {
    /// The same count for every size.
    Fixed(u64),
    /// A byte budget divided by the message size, so every size moves
    /// roughly the same amount of data.
    Budget(u64),
}

/// Customized config for creating a [`Bench`].
///
/// ```
/// use std::time::Duration;
/// use cipherbench::BenchConfig;
///
/// let bench = BenchConfig::new()
///     .set_message_sizes(&[64])
///     .set_iterations(10)
///     .set_progress_interval(Some(Duration::from_secs(1)))
///     .build()
///     .unwrap();
/// # let _ = bench;
/// ```
///
/// Configs implement [`Clone`] to help run the same setup against several
/// provider sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub(crate) message_sizes: Vec<usize>,
    pub(crate) iterations: Iterations,
    pub(crate) progress_interval: Option<Duration>,
    pub(crate) suites: Option<Vec<CipherSuite>>,
}

impl BenchConfig {
    /// Creates a new default config.
    pub fn new() -> Self {
        BenchConfig::default()
    }

    /// Message sizes to benchmark, in bytes.
    ///
    /// Every provider is run once per size, sizes in the given order.
    pub fn set_message_sizes(mut self, sizes: &[usize]) -> Self {
        self.message_sizes = sizes.to_vec();
        self
    }

    /// The configured message sizes.
    ///
    /// ```
    /// # use cipherbench::BenchConfig;
    /// let config = BenchConfig::new();
    ///
    /// // Defaults to 64, 512 and 1024.
    /// assert_eq!(config.message_sizes(), &[64, 512, 1024]);
    /// ```
    pub fn message_sizes(&self) -> &[usize] {
        &self.message_sizes
    }

    /// Run exactly `n` iterations for every message size.
    pub fn set_iterations(mut self, n: u64) -> Self {
        self.iterations = Iterations::Fixed(n);
        self
    }

    /// Derive iterations from a byte budget: `budget / message_size`.
    pub fn set_iteration_budget(mut self, budget: u64) -> Self {
        self.iterations = Iterations::Budget(budget);
        self
    }

    /// The iteration policy.
    pub fn iterations(&self) -> Iterations {
        self.iterations
    }

    /// Iterations to run for `message_size`. Never zero for a valid config.
    pub fn iterations_for(&self, message_size: usize) -> u64 {
        match self.iterations {
            Iterations::Fixed(n) => n,
            Iterations::Budget(budget) => (budget / message_size.max(1) as u64).max(1),
        }
    }

    /// Set the interval between progress log lines.
    ///
    /// None turns progress reporting off. This is the default.
    pub fn set_progress_interval(mut self, interval: Option<Duration>) -> Self {
        self.progress_interval = interval;
        self
    }

    /// The configured progress interval.
    pub fn progress_interval(&self) -> Option<Duration> {
        self.progress_interval
    }

    /// Restrict benchmarking to these suites.
    ///
    /// Suites a provider does not list are not attempted. None runs every
    /// suite each provider lists.
    pub fn set_suites(mut self, suites: Option<&[CipherSuite]>) -> Self {
        self.suites = suites.map(|s| s.to_vec());
        self
    }

    /// Whether `suite` passes the suite filter.
    pub fn includes(&self, suite: CipherSuite) -> bool {
        self.suites.as_ref().map_or(true, |s| s.contains(&suite))
    }

    /// Check the config is runnable.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.message_sizes.is_empty() {
            return Err(BenchError::Config("no message sizes".into()));
        }
        if self.message_sizes.contains(&0) {
            return Err(BenchError::Config("message size must be > 0".into()));
        }
        match self.iterations {
            Iterations::Fixed(0) => {
                return Err(BenchError::Config("iterations must be > 0".into()));
            }
            Iterations::Budget(0) => {
                return Err(BenchError::Config("iteration budget must be > 0".into()));
            }
            _ => {}
        }
        if matches!(&self.suites, Some(s) if s.is_empty()) {
            return Err(BenchError::Config("empty suite filter".into()));
        }
        if self.progress_interval == Some(Duration::ZERO) {
            return Err(BenchError::Config("progress interval must be > 0".into()));
        }
        Ok(())
    }

    /// Create a [`Bench`] from the configuration.
    pub fn build(self) -> Result<Bench, BenchError> {
        Bench::new(self)
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            message_sizes: DEFAULT_MESSAGE_SIZES.to_vec(),
            iterations: Iterations::Budget(DEFAULT_ITERATION_BUDGET),
            progress_interval: None,
            suites: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn budget_iterations() {
        let config = BenchConfig::new();
        assert_eq!(config.iterations_for(64), 64_000_000);
        assert_eq!(config.iterations_for(1024), 4_000_000);

        let config = config.set_iteration_budget(10);
        assert_eq!(config.iterations_for(1024), 1);
    }

    #[test]
    fn fixed_iterations() {
        let config = BenchConfig::new().set_iterations(3);
        assert_eq!(config.iterations_for(64), 3);
        assert_eq!(config.iterations_for(4096), 3);
    }

    #[test]
    fn rejects_unrunnable() {
        assert!(BenchConfig::new().validate().is_ok());
        assert!(BenchConfig::new().set_message_sizes(&[]).validate().is_err());
        assert!(BenchConfig::new().set_message_sizes(&[0]).validate().is_err());
        assert!(BenchConfig::new().set_iterations(0).validate().is_err());
        assert!(BenchConfig::new().set_iteration_budget(0).validate().is_err());
        assert!(BenchConfig::new().set_suites(Some(&[])).validate().is_err());
        assert!(BenchConfig::new()
            .set_progress_interval(Some(Duration::ZERO))
            .validate()
            .is_err());
    }

    #[test]
    fn suite_filter() {
        let config = BenchConfig::new();
        assert!(config.includes(CipherSuite::Aes128Ctr));

        let config = config.set_suites(Some(&[CipherSuite::Aes256Gcm]));
        assert!(config.includes(CipherSuite::Aes256Gcm));
        assert!(!config.includes(CipherSuite::Aes128Ctr));
    }

    #[test]
    fn serde_partial() {
        let config: BenchConfig =
            serde_json::from_str(r#"{"message_sizes":[128],"iterations":{"fixed":5}}"#).unwrap();
        assert_eq!(config.message_sizes(), &[128]);
        assert_eq!(config.iterations(), Iterations::Fixed(5));
        assert_eq!(config.progress_interval(), None);
    }
}
