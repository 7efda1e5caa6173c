//! Cipher suite identifiers and their key, IV and tag geometry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::BenchError;

/// Minimum IV length regardless of the algorithm's natural block size.
pub const MIN_IV_LEN: usize = 16;

/// An (algorithm, mode) pairing identified by a canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherSuite {
    /// AES-128 in Galois/Counter Mode.
    #[serde(rename = "AES-128-GCM")]
    Aes128Gcm,
    /// AES-256 in Galois/Counter Mode.
    #[serde(rename = "AES-256-GCM")]
    Aes256Gcm,
    /// ChaCha20 stream cipher with the Poly1305 authenticator (RFC 8439).
    #[serde(rename = "CHACHA20-POLY1305")]
    ChaCha20Poly1305,
    /// AES-128 in counter mode. Unauthenticated, no expansion.
    #[serde(rename = "AES-128-CTR")]
    Aes128Ctr,
}

impl CipherSuite {
    /// All suites known to the harness, in default iteration order.
    pub const ALL: &'static [CipherSuite] = &[
        CipherSuite::Aes256Gcm,
        CipherSuite::ChaCha20Poly1305,
        CipherSuite::Aes128Gcm,
        CipherSuite::Aes128Ctr,
    ];

    /// Largest tag any suite appends.
    pub const MAX_TAG_LEN: usize = 16;

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            CipherSuite::Aes128Gcm => "AES-128-GCM",
            CipherSuite::Aes256Gcm => "AES-256-GCM",
            CipherSuite::ChaCha20Poly1305 => "CHACHA20-POLY1305",
            CipherSuite::Aes128Ctr => "AES-128-CTR",
        }
    }

    /// Key length in bytes.
    #[rustfmt::skip]
    pub fn key_len(&self) -> usize {
        match self {
            CipherSuite::Aes128Gcm        => 16,
            CipherSuite::Aes256Gcm        => 32,
            CipherSuite::ChaCha20Poly1305 => 32,
            CipherSuite::Aes128Ctr        => 16,
        }
    }

    /// Natural block length of the underlying algorithm.
    pub fn block_len(&self) -> usize {
        match self {
            CipherSuite::ChaCha20Poly1305 => 1,
            _ => 16,
        }
    }

    /// Length of the IV kept in provider state, never below [`MIN_IV_LEN`].
    pub fn iv_len(&self) -> usize {
        self.block_len().max(MIN_IV_LEN)
    }

    /// The leading bytes of the IV the backend uses as nonce.
    pub fn nonce_len(&self) -> usize {
        match self {
            CipherSuite::Aes128Ctr => 16,
            _ => 12,
        }
    }

    /// Authentication tag length appended to the ciphertext.
    pub fn tag_len(&self) -> usize {
        match self {
            CipherSuite::Aes128Ctr => 0,
            _ => 16,
        }
    }

    /// Whether the suite authenticates its ciphertext.
    pub fn is_aead(&self) -> bool {
        self.tag_len() > 0
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CipherSuite {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CipherSuite::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BenchError::UnsupportedCipher(s.to_string()))
    }
}
