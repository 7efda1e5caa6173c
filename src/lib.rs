//! Symmetric cipher throughput across interchangeable crypto providers.
//!
//! Every backend implements the same small contract ([`crypto::Provider`] and
//! [`crypto::CipherInstance`]) and is driven through the same protocol by
//! [`Bench`], so the bytes/second numbers are comparable between libraries.
//!
//! # Protocol
//!
//! For each message size and each provider:
//!
//! 1. `init` the provider. If that fails the provider is reported and skipped.
//! 2. Fill one plaintext buffer with random bytes. It is reused for every suite.
//! 3. For each cipher suite the provider lists:
//!    1. `set_cipher`, which generates a fresh key and IV. Unsupported suites
//!       are skipped, other configuration errors fail the suite.
//!    2. Run `iterations` × (`encrypt` plaintext → buffer, `decrypt` buffer in
//!       place) while timing. The first error ends the loop.
//!    3. Compare the buffer against the plaintext byte for byte.
//!    4. Report `iterations × message_size / elapsed` when the round trip held.
//! 4. `free` the provider.
//!
//! The timed loop is single threaded and never blocks, logs or allocates.
//!
//! # Providers
//!
//! Providers are selected at compile time with cargo features, see [`crypto`].
//!
//! ```no_run
//! use cipherbench::{crypto, BenchConfig};
//!
//! let bench = BenchConfig::new()
//!     .set_message_sizes(&[64, 1024])
//!     .set_iterations(100_000)
//!     .build()
//!     .expect("a valid config");
//!
//! let report = bench.run(&crypto::providers_from_feature_flags());
//!
//! for provider in &report.providers {
//!     println!("{}", provider);
//! }
//!
//! std::process::exit(if report.is_success() { 0 } else { 1 });
//! ```
//!
//! # Writing a provider
//!
//! Implement [`crypto::Provider`] for a zero sized descriptor and
//! [`crypto::CipherInstance`] for the state it hands out from `init`. The
//! instance must re-apply its IV before every `encrypt` and `decrypt`, since
//! the driver calls them back to back on the same key. Unknown suites should
//! return [`BenchError::UnsupportedCipher`].
//!
//! # Logging
//!
//! The crate logs with [`tracing`]. Rate lines are `info`, skipped suites
//! `warn` and failures `error`. Nothing is logged inside the timed loop.

#![forbid(unsafe_code)]
#![allow(clippy::new_without_default)]
#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod bench;
pub use bench::Bench;

mod config;
pub use config::{BenchConfig, Iterations, DEFAULT_ITERATION_BUDGET, DEFAULT_MESSAGE_SIZES};

pub mod crypto;

mod error;
pub use error::{BenchError, Stage};

pub mod progress;

mod report;
pub use report::{Outcome, ProviderReport, RunReport, SuiteReport};

pub mod suite;
pub use suite::CipherSuite;

mod validate;
pub use validate::validate;
