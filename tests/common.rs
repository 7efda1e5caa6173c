#![allow(unused)]
use std::sync::Once;

use cipherbench::crypto::{check_buffer, ciphertext_body, CipherInstance, KeyMaterial, Provider};
use cipherbench::{BenchError, CipherSuite};

pub fn init_log() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    static START: Once = Once::new();

    START.call_once(|| {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(env_filter)
            .init();
    });
}

/// Failures a [`TestProvider`] injects on purpose.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    pub fail_init: bool,
    pub fail_random: bool,
    /// Fail encryption of `suite` once `n` iterations have completed.
    pub fail_encrypt_at: Option<(CipherSuite, u64)>,
    /// Fail decryption of `suite` once `n` iterations have completed.
    pub fail_decrypt_at: Option<(CipherSuite, u64)>,
    /// Flip a plaintext byte after decrypting with this suite.
    pub corrupt_decrypt: Option<CipherSuite>,
    /// Report these suites as unknown to the backend.
    pub unsupported: Vec<CipherSuite>,
    /// Reject the generated key for this suite.
    pub reject_key: Option<CipherSuite>,
}

/// A backend with a toy cipher, so driver behavior can be tested without a
/// real crypto library.
///
/// The "cipher" XORs a keystream derived from key and IV and appends a
/// checksum as tag. It is not secure.
#[derive(Debug)]
pub struct TestProvider {
    name: &'static str,
    suites: &'static [CipherSuite],
    faults: Faults,
}

impl TestProvider {
    pub fn new(name: &'static str, suites: &'static [CipherSuite]) -> Self {
        TestProvider {
            name,
            suites,
            faults: Faults::default(),
        }
    }

    pub fn with_faults(mut self, faults: Faults) -> Self {
        self.faults = faults;
        self
    }
}

impl Provider for TestProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn cipher_suites(&self) -> &'static [CipherSuite] {
        self.suites
    }

    fn init(&self) -> Result<Box<dyn CipherInstance>, BenchError> {
        if self.faults.fail_init {
            return Err(BenchError::Init("test provider refused to start".into()));
        }
        Ok(Box::new(TestInstance {
            faults: self.faults.clone(),
            rng: fastrand::Rng::new(),
            keys: None,
            encrypted: 0,
            decrypted: 0,
        }))
    }
}

#[derive(Debug)]
struct TestInstance {
    faults: Faults,
    rng: fastrand::Rng,
    keys: Option<KeyMaterial>,
    encrypted: u64,
    decrypted: u64,
}

impl TestInstance {
    fn keystream(keys: &KeyMaterial, buf: &mut [u8]) {
        let key = keys.key();
        let iv = keys.iv();
        for (i, b) in buf.iter_mut().enumerate() {
            *b ^= key[i % key.len()] ^ iv[i % iv.len()] ^ (i as u8);
        }
    }

    fn checksum(body: &[u8], tag: &mut [u8]) {
        tag.fill(0);
        for (i, b) in body.iter().enumerate() {
            let t = i % tag.len();
            tag[t] = tag[t].rotate_left(1) ^ b;
        }
    }
}

impl CipherInstance for TestInstance {
    fn random(&mut self, dst: &mut [u8]) -> Result<(), BenchError> {
        if self.faults.fail_random {
            return Err(BenchError::Random("no entropy".into()));
        }
        self.rng.fill(dst);
        Ok(())
    }

    fn set_cipher(&mut self, suite: CipherSuite) -> Result<(), BenchError> {
        self.keys = None;
        self.encrypted = 0;
        self.decrypted = 0;

        if self.faults.unsupported.contains(&suite) {
            return Err(BenchError::UnsupportedCipher(suite.to_string()));
        }
        if self.faults.reject_key == Some(suite) {
            return Err(BenchError::Config(format!("{}: key rejected", suite)));
        }

        let rng = &mut self.rng;
        let keys = KeyMaterial::generate(suite, |buf| {
            rng.fill(buf);
            Ok(())
        })?;
        self.keys = Some(keys);
        Ok(())
    }

    fn encrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, BenchError> {
        let keys = self.keys.as_ref().ok_or(BenchError::NoCipher)?;
        let suite = keys.suite();

        if let Some((s, n)) = self.faults.fail_encrypt_at {
            if s == suite && self.encrypted == n {
                return Err(BenchError::Encrypt("injected failure".into()));
            }
        }

        let len = src.len();
        let tag_len = suite.tag_len();
        check_buffer(len + tag_len, dst.len())?;

        dst[..len].copy_from_slice(src);
        let (body, rest) = dst.split_at_mut(len);
        Self::keystream(keys, body);
        if tag_len > 0 {
            Self::checksum(body, &mut rest[..tag_len]);
        }

        self.encrypted += 1;
        Ok(len + tag_len)
    }

    fn decrypt_in_place(&mut self, buf: &mut [u8], len: usize) -> Result<usize, BenchError> {
        let keys = self.keys.as_ref().ok_or(BenchError::NoCipher)?;
        let suite = keys.suite();

        if let Some((s, n)) = self.faults.fail_decrypt_at {
            if s == suite && self.decrypted == n {
                return Err(BenchError::Decrypt("injected failure".into()));
            }
        }

        let body_len = ciphertext_body(suite, buf.len(), len)?;
        let (body, tag) = buf[..len].split_at_mut(body_len);

        if !tag.is_empty() {
            let mut expected = vec![0; tag.len()];
            Self::checksum(body, &mut expected);
            if expected != tag {
                return Err(BenchError::Decrypt("tag mismatch".into()));
            }
        }

        Self::keystream(keys, body);

        if self.faults.corrupt_decrypt == Some(suite) && !body.is_empty() {
            let last = body.len() - 1;
            body[last] ^= 0xff;
        }

        self.decrypted += 1;
        Ok(body_len)
    }
}
