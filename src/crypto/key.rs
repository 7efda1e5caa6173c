use zeroize::Zeroize;

use crate::{BenchError, CipherSuite};

/// Key and IV bound to one cipher suite.
///
/// Both buffers are sized exactly to what the suite requires and are wiped
/// when the material is dropped. Switching suites means building a new
/// `KeyMaterial`, never mutating an existing one.
pub struct KeyMaterial {
    suite: CipherSuite,
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl KeyMaterial {
    /// Generate fresh key and IV for `suite` using the given random source.
    pub fn generate<F>(suite: CipherSuite, mut fill: F) -> Result<Self, BenchError>
    where
        F: FnMut(&mut [u8]) -> Result<(), BenchError>,
    {
        let mut key = vec![0; suite.key_len()];
        let mut iv = vec![0; suite.iv_len()];

        fill(&mut key)?;
        fill(&mut iv)?;

        Ok(KeyMaterial { suite, key, iv })
    }

    /// The suite this material was generated for.
    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Symmetric key.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Full IV, at least [`MIN_IV_LEN`](crate::suite::MIN_IV_LEN) long.
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// The leading IV bytes handed to the backend as nonce.
    pub fn nonce(&self) -> &[u8] {
        &self.iv[..self.suite.nonce_len()]
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.key.zeroize();
        self.iv.zeroize();
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("suite", &self.suite)
            .finish()
    }
}
