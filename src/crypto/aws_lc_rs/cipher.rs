//! Cipher contexts using AWS-LC-RS.

use aws_lc_rs::aead::{Aad, Algorithm, LessSafeKey, Nonce, UnboundKey};
use aws_lc_rs::aead::{AES_128_GCM, AES_256_GCM, CHACHA20_POLY1305};

use crate::crypto::{check_buffer, ciphertext_body, CipherInstance, KeyMaterial};
use crate::{BenchError, CipherSuite};

fn fill_random(dst: &mut [u8]) -> Result<(), BenchError> {
    aws_lc_rs::rand::fill(dst).map_err(|e| BenchError::Random(e.to_string()))
}

fn algorithm_for(suite: CipherSuite) -> Option<&'static Algorithm> {
    match suite {
        CipherSuite::Aes128Gcm => Some(&AES_128_GCM),
        CipherSuite::Aes256Gcm => Some(&AES_256_GCM),
        CipherSuite::ChaCha20Poly1305 => Some(&CHACHA20_POLY1305),
        CipherSuite::Aes128Ctr => None,
    }
}

struct Active {
    keys: KeyMaterial,
    key: LessSafeKey,
}

impl Active {
    fn nonce(&self) -> Result<Nonce, String> {
        Nonce::try_assume_unique_for_key(self.keys.nonce())
            .map_err(|e| format!("Invalid nonce: {}", e))
    }
}

pub(super) struct AwsLcRsCipherInstance {
    active: Option<Active>,
}

impl AwsLcRsCipherInstance {
    pub fn new() -> Self {
        AwsLcRsCipherInstance { active: None }
    }
}

impl std::fmt::Debug for AwsLcRsCipherInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsLcRsCipherInstance")
            .field("suite", &self.active.as_ref().map(|a| a.keys.suite()))
            .finish()
    }
}

impl CipherInstance for AwsLcRsCipherInstance {
    fn random(&mut self, dst: &mut [u8]) -> Result<(), BenchError> {
        fill_random(dst)
    }

    fn set_cipher(&mut self, suite: CipherSuite) -> Result<(), BenchError> {
        self.active = None;

        let algorithm = algorithm_for(suite)
            .ok_or_else(|| BenchError::UnsupportedCipher(suite.to_string()))?;

        let keys = KeyMaterial::generate(suite, fill_random)?;
        let unbound = UnboundKey::new(algorithm, keys.key())
            .map_err(|e| BenchError::Config(format!("{}: {}", suite, e)))?;

        self.active = Some(Active {
            keys,
            key: LessSafeKey::new(unbound),
        });
        Ok(())
    }

    fn encrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, BenchError> {
        let active = self.active.as_ref().ok_or(BenchError::NoCipher)?;
        let len = src.len();
        let tag_len = active.keys.suite().tag_len();
        check_buffer(len + tag_len, dst.len())?;

        let nonce = active.nonce().map_err(BenchError::Encrypt)?;

        dst[..len].copy_from_slice(src);
        let tag = active
            .key
            .seal_in_place_separate_tag(nonce, Aad::empty(), &mut dst[..len])
            .map_err(|e| BenchError::Encrypt(format!("AEAD seal failed: {}", e)))?;

        let tag = tag.as_ref();
        dst[len..len + tag.len()].copy_from_slice(tag);

        Ok(len + tag.len())
    }

    fn decrypt_in_place(&mut self, buf: &mut [u8], len: usize) -> Result<usize, BenchError> {
        let active = self.active.as_ref().ok_or(BenchError::NoCipher)?;
        ciphertext_body(active.keys.suite(), buf.len(), len)?;

        let nonce = active.nonce().map_err(BenchError::Decrypt)?;

        let plaintext = active
            .key
            .open_in_place(nonce, Aad::empty(), &mut buf[..len])
            .map_err(|e| BenchError::Decrypt(format!("AEAD open failed: {}", e)))?;

        Ok(plaintext.len())
    }

    fn free(self: Box<Self>) {
        trace!("Free AWS-LC-RS keys");
    }
}
