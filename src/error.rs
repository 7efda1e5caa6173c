use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors arising while driving a provider through a benchmark.
///
/// Every variant carries a detail string from the backend so diagnostics can
/// name what went wrong without the driver knowing backend types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BenchError {
    /// The backend is unusable: version requirements unmet or allocation failed.
    #[error("init: {0}")]
    Init(String),

    /// The cipher suite is not recognized by this backend.
    #[error("unsupported cipher: {0}")]
    UnsupportedCipher(String),

    /// The backend rejected key or IV, or the benchmark configuration is invalid.
    #[error("config: {0}")]
    Config(String),

    /// The backend random source is unavailable.
    #[error("random: {0}")]
    Random(String),

    /// Encryption failed.
    #[error("encrypt: {0}")]
    Encrypt(String),

    /// Decryption failed.
    #[error("decrypt: {0}")]
    Decrypt(String),

    /// Round trip produced different bytes than the input.
    #[error("decrypted message doesn't match original at offset {offset}")]
    ValidationMismatch {
        /// First offset where the buffers differ.
        offset: usize,
    },

    /// Encrypt or decrypt called before any `set_cipher`.
    #[error("no cipher configured")]
    NoCipher,

    /// Destination buffer is smaller than `buffer_size` requires.
    #[error("buffer too small: need {need}, have {have}")]
    BufferTooSmall {
        /// Required length.
        need: usize,
        /// Actual length.
        have: usize,
    },
}

/// The point in the benchmark protocol where an error surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Provider initialization.
    Init,
    /// Cipher configuration.
    SetCipher,
    /// Random input generation.
    Random,
    /// Encryption in the timed loop.
    Encrypt,
    /// Decryption in the timed loop.
    Decrypt,
    /// Round trip comparison.
    Validate,
    /// Buffer sizing, before any backend call.
    Buffer,
}

impl BenchError {
    /// The stage this error belongs to.
    pub fn stage(&self) -> Stage {
        use BenchError::*;
        match self {
            Init(_) => Stage::Init,
            // Either transform can hit these, so they name what is missing.
            UnsupportedCipher(_) | Config(_) | NoCipher => Stage::SetCipher,
            BufferTooSmall { .. } => Stage::Buffer,
            Random(_) => Stage::Random,
            Encrypt(_) => Stage::Encrypt,
            Decrypt(_) => Stage::Decrypt,
            ValidationMismatch { .. } => Stage::Validate,
        }
    }

    /// The error without its variant prefix, for lines that already name the stage.
    pub fn detail(&self) -> Cow<'_, str> {
        use BenchError::*;
        match self {
            Init(s) | UnsupportedCipher(s) | Config(s) | Random(s) | Encrypt(s) | Decrypt(s) => {
                Cow::Borrowed(s.as_str())
            }
            _ => Cow::Owned(self.to_string()),
        }
    }

    /// Whether the error only skips the current suite without failing the run.
    pub fn is_skip(&self) -> bool {
        matches!(self, BenchError::UnsupportedCipher(_))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Init => "initialization",
            Stage::SetCipher => "set cipher",
            Stage::Random => "input randomization",
            Stage::Encrypt => "encryption",
            Stage::Decrypt => "decryption",
            Stage::Validate => "validation",
            Stage::Buffer => "buffer check",
        };
        write!(f, "{}", s)
    }
}

impl Serialize for BenchError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
