//! RustCrypto provider.
//!
//! Pure Rust implementations from the RustCrypto project: `aes-gcm`,
//! `chacha20poly1305` and `ctr` over `aes`. Randomness comes from the OS
//! through `getrandom`.
//!
//! # Feature Flag
//!
//! This module is only available when the `rust-crypto` feature is enabled.

mod cipher;

use crate::crypto::{CipherInstance, Provider};
use crate::{BenchError, CipherSuite};

use cipher::RustCryptoCipherInstance;

const SUITES: &[CipherSuite] = &[
    CipherSuite::Aes256Gcm,
    CipherSuite::ChaCha20Poly1305,
    CipherSuite::Aes128Gcm,
    CipherSuite::Aes128Ctr,
];

/// The RustCrypto provider descriptor.
///
/// # Supported Suites
///
/// - `AES-256-GCM`
/// - `CHACHA20-POLY1305`
/// - `AES-128-GCM`
/// - `AES-128-CTR`
pub fn default_provider() -> &'static dyn Provider {
    static PROVIDER: RustCryptoProvider = RustCryptoProvider;
    &PROVIDER
}

struct RustCryptoProvider;

impl std::fmt::Debug for RustCryptoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RustCryptoProvider").finish()
    }
}

impl Provider for RustCryptoProvider {
    fn name(&self) -> &'static str {
        "rust-crypto"
    }

    fn cipher_suites(&self) -> &'static [CipherSuite] {
        SUITES
    }

    fn init(&self) -> Result<Box<dyn CipherInstance>, BenchError> {
        // Nothing to load, but fail early if the OS has no entropy for us.
        let mut probe = [0_u8; 1];
        getrandom::fill(&mut probe).map_err(|e| BenchError::Init(e.to_string()))?;

        Ok(Box::new(RustCryptoCipherInstance::new()))
    }
}
