//! Crypto providers and the contract they implement.
//!
//! Each backend lives in its own module behind a cargo feature:
//!
//! | Feature       | Provider name  | Suites                                   |
//! |---------------|----------------|------------------------------------------|
//! | `openssl`     | `openssl`      | AES-256-GCM, CHACHA20-POLY1305, AES-128-GCM, AES-128-CTR |
//! | `rust-crypto` | `rust-crypto`  | AES-256-GCM, CHACHA20-POLY1305, AES-128-GCM, AES-128-CTR |
//! | `aws-lc-rs`   | `aws-lc-rs`    | AES-256-GCM, CHACHA20-POLY1305, AES-128-GCM |

mod key;
pub use key::KeyMaterial;

mod provider;
pub use provider::{check_buffer, ciphertext_body, CipherInstance, CryptoSafe, Provider};

#[cfg(feature = "aws-lc-rs")]
pub mod aws_lc_rs;

#[cfg(feature = "openssl")]
pub mod openssl;

#[cfg(feature = "rust-crypto")]
pub mod rust_crypto;

/// All providers enabled by feature flags.
///
/// Order: aws-lc-rs, rust-crypto, openssl.
#[allow(clippy::vec_init_then_push, unused_mut)]
pub fn providers_from_feature_flags() -> Vec<&'static dyn Provider> {
    let mut providers: Vec<&'static dyn Provider> = Vec::new();

    #[cfg(feature = "aws-lc-rs")]
    providers.push(aws_lc_rs::default_provider());

    #[cfg(feature = "rust-crypto")]
    providers.push(rust_crypto::default_provider());

    #[cfg(feature = "openssl")]
    providers.push(openssl::default_provider());

    providers
}

/// Look up an enabled provider by its display name (case insensitive).
pub fn provider_by_name(name: &str) -> Option<&'static dyn Provider> {
    providers_from_feature_flags()
        .into_iter()
        .find(|p| p.name().eq_ignore_ascii_case(name))
}
