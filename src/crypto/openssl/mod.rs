//! OpenSSL provider.
//!
//! Uses the EVP cipher API through the `openssl` crate. One context is kept
//! per direction and re-seeded with the IV before every operation.
//!
//! # Feature Flag
//!
//! This module is only available when the `openssl` feature is enabled.
//! The `openssl` feature is included in the default features. Enable
//! `vendored` to build and link a pinned OpenSSL from source.

mod cipher;

use openssl::version;

use crate::crypto::{CipherInstance, Provider};
use crate::{BenchError, CipherSuite};

use cipher::OsslCipherInstance;

/// 1.1.0 is the first release with ChaCha20-Poly1305.
const MIN_VERSION_NUMBER: i64 = 0x1010_0000;
const MIN_VERSION_TEXT: &str = "1.1.0";

const SUITES: &[CipherSuite] = &[
    CipherSuite::Aes256Gcm,
    CipherSuite::ChaCha20Poly1305,
    CipherSuite::Aes128Gcm,
    CipherSuite::Aes128Ctr,
];

/// The OpenSSL provider descriptor.
///
/// # Supported Suites
///
/// - `AES-256-GCM`
/// - `CHACHA20-POLY1305`
/// - `AES-128-GCM`
/// - `AES-128-CTR`
pub fn default_provider() -> &'static dyn Provider {
    static PROVIDER: OsslProvider = OsslProvider;
    &PROVIDER
}

struct OsslProvider;

impl std::fmt::Debug for OsslProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsslProvider").finish()
    }
}

impl Provider for OsslProvider {
    fn name(&self) -> &'static str {
        "openssl"
    }

    fn cipher_suites(&self) -> &'static [CipherSuite] {
        SUITES
    }

    fn init(&self) -> Result<Box<dyn CipherInstance>, BenchError> {
        openssl::init();

        if version::number() < MIN_VERSION_NUMBER {
            return Err(BenchError::Init(format!(
                "Invalid version required {}, found {}",
                MIN_VERSION_TEXT,
                version::version()
            )));
        }

        debug!("Using {}", version::version());

        Ok(Box::new(OsslCipherInstance::new()))
    }
}
