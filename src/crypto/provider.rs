//! Provider traits for pluggable crypto backends.
//!
//! A backend is benchmarked purely through these two traits: [`Provider`]
//! describes it and creates instances, [`CipherInstance`] owns the key
//! material and cipher contexts for one benchmark run.
//!
//! Implementors of a provider only need to depend on this module.

use std::fmt::Debug;

use crate::{BenchError, CipherSuite};

/// Marker trait for types that are safe to use as provider descriptors.
///
/// - [`Send`] + [`Sync`]: descriptors are `&'static` and shared freely
/// - [`Debug`]: support debugging
pub trait CryptoSafe: Send + Sync + Debug {}

/// Blanket implementation: any type satisfying the bounds implements [`CryptoSafe`].
impl<T: Send + Sync + Debug> CryptoSafe for T {}

/// Descriptor of one cryptography backend.
///
/// Descriptors are immutable for the program lifetime. All mutable state lives
/// in the [`CipherInstance`] returned by [`Provider::init`].
pub trait Provider: CryptoSafe {
    /// Stable display name.
    fn name(&self) -> &'static str;

    /// Supported cipher suites in iteration order. May be empty.
    fn cipher_suites(&self) -> &'static [CipherSuite];

    /// Allocate and initialize a new instance of this backend.
    ///
    /// Fails with [`BenchError::Init`] when library requirements are unmet.
    fn init(&self) -> Result<Box<dyn CipherInstance>, BenchError>;

    /// Destination buffer length needed to encrypt `plaintext_len` bytes with
    /// any suite of this provider.
    fn buffer_size(&self, plaintext_len: usize) -> usize {
        plaintext_len + CipherSuite::MAX_TAG_LEN
    }
}

/// Backend state for one benchmark run: key, IV and the active cipher context.
///
/// An instance has at most one active cipher configuration at a time.
pub trait CipherInstance: Send + Debug {
    /// Fill `dst` with cryptographically strong random bytes.
    fn random(&mut self, dst: &mut [u8]) -> Result<(), BenchError>;

    /// Select `suite`, generate a fresh key and IV and bind a cipher context to them.
    ///
    /// Any previous configuration is fully replaced. Suites the backend does not
    /// know fail with [`BenchError::UnsupportedCipher`] and leave the instance
    /// usable for the next suite.
    fn set_cipher(&mut self, suite: CipherSuite) -> Result<(), BenchError>;

    /// Encrypt `src` into `dst`, returning the ciphertext length (including tag).
    ///
    /// The IV is re-applied before every call so repeated encryptions are
    /// independent of each other.
    fn encrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, BenchError>;

    /// Decrypt the first `len` bytes of `buf` in place, returning the plaintext length.
    fn decrypt_in_place(&mut self, buf: &mut [u8], len: usize) -> Result<usize, BenchError>;

    /// Decrypt `src` into `dst`, returning the plaintext length.
    ///
    /// Produces the same plaintext as [`CipherInstance::decrypt_in_place`].
    fn decrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, BenchError> {
        check_buffer(src.len(), dst.len())?;
        dst[..src.len()].copy_from_slice(src);
        self.decrypt_in_place(dst, src.len())
    }

    /// Release all backend resources.
    fn free(self: Box<Self>) {}
}

/// Ensure a destination of `have` bytes can hold `need` bytes.
pub fn check_buffer(need: usize, have: usize) -> Result<(), BenchError> {
    if have < need {
        return Err(BenchError::BufferTooSmall { need, have });
    }
    Ok(())
}

/// Split `len` bytes of ciphertext into body length, rejecting input shorter than the tag.
pub fn ciphertext_body(suite: CipherSuite, buf_len: usize, len: usize) -> Result<usize, BenchError> {
    if len > buf_len {
        return Err(BenchError::Decrypt(format!(
            "ciphertext length {} exceeds buffer {}",
            len, buf_len
        )));
    }
    len.checked_sub(suite.tag_len()).ok_or_else(|| {
        BenchError::Decrypt(format!(
            "ciphertext length {} shorter than {} tag",
            len, suite
        ))
    })
}
