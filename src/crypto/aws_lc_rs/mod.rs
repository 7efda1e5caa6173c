//! AWS-LC-RS provider.
//!
//! AEADs through `aws_lc_rs::aead::LessSafeKey`, which lets the harness pick
//! the nonce itself. AWS-LC offers no counter mode through the same API, so
//! `AES-128-CTR` is reported as unsupported.
//!
//! # Feature Flag
//!
//! This module is only available when the `aws-lc-rs` feature is enabled.

mod cipher;

use crate::crypto::{CipherInstance, Provider};
use crate::{BenchError, CipherSuite};

use cipher::AwsLcRsCipherInstance;

const SUITES: &[CipherSuite] = &[
    CipherSuite::Aes256Gcm,
    CipherSuite::ChaCha20Poly1305,
    CipherSuite::Aes128Gcm,
];

/// The AWS-LC-RS provider descriptor.
///
/// # Supported Suites
///
/// - `AES-256-GCM`
/// - `CHACHA20-POLY1305`
/// - `AES-128-GCM`
pub fn default_provider() -> &'static dyn Provider {
    static PROVIDER: AwsLcRsProvider = AwsLcRsProvider;
    &PROVIDER
}

struct AwsLcRsProvider;

impl std::fmt::Debug for AwsLcRsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsLcRsProvider").finish()
    }
}

impl Provider for AwsLcRsProvider {
    fn name(&self) -> &'static str {
        "aws-lc-rs"
    }

    fn cipher_suites(&self) -> &'static [CipherSuite] {
        SUITES
    }

    fn init(&self) -> Result<Box<dyn CipherInstance>, BenchError> {
        let mut probe = [0_u8; 1];
        aws_lc_rs::rand::fill(&mut probe).map_err(|e| BenchError::Init(e.to_string()))?;

        Ok(Box::new(AwsLcRsCipherInstance::new()))
    }
}
