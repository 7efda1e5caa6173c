//! Cipher contexts using RustCrypto.

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm};
use chacha20poly1305::ChaCha20Poly1305;
use ctr::cipher::{KeyIvInit, StreamCipher};

use crate::crypto::{check_buffer, ciphertext_body, CipherInstance, KeyMaterial};
use crate::{BenchError, CipherSuite};

// Type alias for AES-128 in CTR mode
type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

fn fill_random(dst: &mut [u8]) -> Result<(), BenchError> {
    getrandom::fill(dst).map_err(|e| BenchError::Random(e.to_string()))
}

enum Engine {
    Aes128Gcm(Aes128Gcm),
    Aes256Gcm(Aes256Gcm),
    ChaCha20Poly1305(ChaCha20Poly1305),
    // The keystream restarts from the IV on every call, so only the key is kept.
    Aes128Ctr,
}

impl Engine {
    fn new(keys: &KeyMaterial) -> Result<Self, BenchError> {
        let config_err = |e| BenchError::Config(format!("{}: {}", keys.suite(), e));
        let key = keys.key();

        let engine = match keys.suite() {
            CipherSuite::Aes128Gcm => {
                Engine::Aes128Gcm(Aes128Gcm::new_from_slice(key).map_err(config_err)?)
            }
            CipherSuite::Aes256Gcm => {
                Engine::Aes256Gcm(Aes256Gcm::new_from_slice(key).map_err(config_err)?)
            }
            CipherSuite::ChaCha20Poly1305 => Engine::ChaCha20Poly1305(
                ChaCha20Poly1305::new_from_slice(key).map_err(config_err)?,
            ),
            CipherSuite::Aes128Ctr => {
                // Validate key and IV lengths once, up front.
                Aes128Ctr::new_from_slices(key, keys.nonce()).map_err(config_err)?;
                Engine::Aes128Ctr
            }
        };

        Ok(engine)
    }
}

struct Active {
    keys: KeyMaterial,
    engine: Engine,
}

pub(super) struct RustCryptoCipherInstance {
    active: Option<Active>,
}

impl RustCryptoCipherInstance {
    pub fn new() -> Self {
        RustCryptoCipherInstance { active: None }
    }
}

impl std::fmt::Debug for RustCryptoCipherInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RustCryptoCipherInstance")
            .field("suite", &self.active.as_ref().map(|a| a.keys.suite()))
            .finish()
    }
}

impl CipherInstance for RustCryptoCipherInstance {
    fn random(&mut self, dst: &mut [u8]) -> Result<(), BenchError> {
        fill_random(dst)
    }

    fn set_cipher(&mut self, suite: CipherSuite) -> Result<(), BenchError> {
        self.active = None;
        let keys = KeyMaterial::generate(suite, fill_random)?;
        let engine = Engine::new(&keys)?;
        self.active = Some(Active { keys, engine });
        Ok(())
    }

    fn encrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, BenchError> {
        let Active { keys, engine } = self.active.as_ref().ok_or(BenchError::NoCipher)?;
        let len = src.len();
        let tag_len = keys.suite().tag_len();
        check_buffer(len + tag_len, dst.len())?;

        dst[..len].copy_from_slice(src);
        let (body, rest) = dst.split_at_mut(len);
        let tag = &mut rest[..tag_len];

        match engine {
            Engine::Aes128Gcm(c) => seal(c, keys, body, tag)?,
            Engine::Aes256Gcm(c) => seal(c, keys, body, tag)?,
            Engine::ChaCha20Poly1305(c) => seal(c, keys, body, tag)?,
            Engine::Aes128Ctr => apply_ctr(keys, body)?,
        }

        Ok(len + tag_len)
    }

    fn decrypt_in_place(&mut self, buf: &mut [u8], len: usize) -> Result<usize, BenchError> {
        let Active { keys, engine } = self.active.as_ref().ok_or(BenchError::NoCipher)?;
        let body_len = ciphertext_body(keys.suite(), buf.len(), len)?;
        let (body, tag) = buf[..len].split_at_mut(body_len);

        match engine {
            Engine::Aes128Gcm(c) => open(c, keys, body, tag)?,
            Engine::Aes256Gcm(c) => open(c, keys, body, tag)?,
            Engine::ChaCha20Poly1305(c) => open(c, keys, body, tag)?,
            // AES-CTR is symmetric (same operation for encrypt and decrypt)
            Engine::Aes128Ctr => apply_ctr(keys, body)?,
        }

        Ok(body_len)
    }

    fn free(self: Box<Self>) {
        trace!("Free RustCrypto cipher state");
    }
}

fn seal<A: AeadInPlace>(
    cipher: &A,
    keys: &KeyMaterial,
    body: &mut [u8],
    tag_out: &mut [u8],
) -> Result<(), BenchError> {
    let nonce = GenericArray::from_slice(keys.nonce());
    let tag = cipher
        .encrypt_in_place_detached(nonce, b"", body)
        .map_err(|e| BenchError::Encrypt(format!("{}: {}", keys.suite(), e)))?;
    tag_out.copy_from_slice(&tag);
    Ok(())
}

fn open<A: AeadInPlace>(
    cipher: &A,
    keys: &KeyMaterial,
    body: &mut [u8],
    tag: &[u8],
) -> Result<(), BenchError> {
    let nonce = GenericArray::from_slice(keys.nonce());
    cipher
        .decrypt_in_place_detached(nonce, b"", body, GenericArray::from_slice(tag))
        .map_err(|e| BenchError::Decrypt(format!("{}: {}", keys.suite(), e)))
}

fn apply_ctr(keys: &KeyMaterial, buf: &mut [u8]) -> Result<(), BenchError> {
    let mut cipher = Aes128Ctr::new_from_slices(keys.key(), keys.nonce())
        .map_err(|e| BenchError::Config(e.to_string()))?;
    cipher.apply_keystream(buf);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn active_keys(i: &RustCryptoCipherInstance) -> (Vec<u8>, Vec<u8>) {
        let keys = &i.active.as_ref().unwrap().keys;
        (keys.key().to_vec(), keys.iv().to_vec())
    }

    #[test]
    fn fresh_key_per_set_cipher() {
        let mut i = RustCryptoCipherInstance::new();
        i.set_cipher(CipherSuite::ChaCha20Poly1305).unwrap();
        let (k1, iv1) = active_keys(&i);
        i.set_cipher(CipherSuite::ChaCha20Poly1305).unwrap();
        let (k2, iv2) = active_keys(&i);
        assert_ne!(k1, k2);
        assert_ne!(iv1, iv2);
        assert_eq!(iv1.len(), 16);
    }

    #[test]
    fn gcm_appends_tag() {
        let mut i = RustCryptoCipherInstance::new();
        i.set_cipher(CipherSuite::Aes128Gcm).unwrap();

        let src = [0x55_u8; 64];
        let mut buf = [0_u8; 80];
        assert_eq!(i.encrypt(&src, &mut buf).unwrap(), 80);
        assert_ne!(&buf[..64], &src[..]);
        assert_eq!(i.decrypt_in_place(&mut buf, 80).unwrap(), 64);
        assert_eq!(&buf[..64], &src[..]);
    }

    #[test]
    fn short_destination() {
        let mut i = RustCryptoCipherInstance::new();
        i.set_cipher(CipherSuite::Aes256Gcm).unwrap();
        let mut dst = [0_u8; 64];
        assert_eq!(
            i.encrypt(&[0; 64], &mut dst),
            Err(BenchError::BufferTooSmall { need: 80, have: 64 })
        );
    }

    #[test]
    fn truncated_ciphertext() {
        let mut i = RustCryptoCipherInstance::new();
        i.set_cipher(CipherSuite::Aes256Gcm).unwrap();
        let mut buf = [0_u8; 8];
        assert!(matches!(
            i.decrypt_in_place(&mut buf, 8),
            Err(BenchError::Decrypt(_))
        ));
    }
}
