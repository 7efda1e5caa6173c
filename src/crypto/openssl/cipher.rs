//! Cipher contexts using OpenSSL.

use openssl::cipher::{Cipher, CipherRef};
use openssl::cipher_ctx::CipherCtx;
use openssl::error::ErrorStack;

use crate::crypto::{check_buffer, ciphertext_body, CipherInstance, KeyMaterial};
use crate::{BenchError, CipherSuite};

fn cipher_for(suite: CipherSuite) -> &'static CipherRef {
    match suite {
        CipherSuite::Aes128Gcm => Cipher::aes_128_gcm(),
        CipherSuite::Aes256Gcm => Cipher::aes_256_gcm(),
        CipherSuite::ChaCha20Poly1305 => Cipher::chacha20_poly1305(),
        CipherSuite::Aes128Ctr => Cipher::aes_128_ctr(),
    }
}

fn fill_random(dst: &mut [u8]) -> Result<(), BenchError> {
    openssl::rand::rand_bytes(dst).map_err(|e| BenchError::Random(e.to_string()))
}

fn config_err(e: ErrorStack) -> BenchError {
    BenchError::Config(e.to_string())
}

fn encrypt_err(e: ErrorStack) -> BenchError {
    BenchError::Encrypt(e.to_string())
}

fn decrypt_err(e: ErrorStack) -> BenchError {
    BenchError::Decrypt(e.to_string())
}

struct Active {
    keys: KeyMaterial,
    enc: CipherCtx,
    dec: CipherCtx,
}

impl Active {
    fn new(suite: CipherSuite) -> Result<Self, BenchError> {
        let keys = KeyMaterial::generate(suite, fill_random)?;
        let t = cipher_for(suite);

        let mut enc = CipherCtx::new().map_err(config_err)?;
        enc.encrypt_init(Some(t), Some(keys.key()), Some(keys.nonce()))
            .map_err(config_err)?;

        let mut dec = CipherCtx::new().map_err(config_err)?;
        dec.decrypt_init(Some(t), Some(keys.key()), Some(keys.nonce()))
            .map_err(config_err)?;

        Ok(Active { keys, enc, dec })
    }
}

pub(super) struct OsslCipherInstance {
    active: Option<Active>,
}

impl OsslCipherInstance {
    pub fn new() -> Self {
        OsslCipherInstance { active: None }
    }
}

impl std::fmt::Debug for OsslCipherInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsslCipherInstance")
            .field("suite", &self.active.as_ref().map(|a| a.keys.suite()))
            .finish()
    }
}

impl CipherInstance for OsslCipherInstance {
    fn random(&mut self, dst: &mut [u8]) -> Result<(), BenchError> {
        fill_random(dst)
    }

    fn set_cipher(&mut self, suite: CipherSuite) -> Result<(), BenchError> {
        // Release the old contexts before allocating new ones.
        self.active = None;
        self.active = Some(Active::new(suite)?);
        Ok(())
    }

    fn encrypt(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, BenchError> {
        let Active { keys, enc, .. } = self.active.as_mut().ok_or(BenchError::NoCipher)?;
        let tag_len = keys.suite().tag_len();
        check_buffer(src.len() + tag_len, dst.len())?;

        enc.encrypt_init(None, None, Some(keys.nonce()))
            .map_err(encrypt_err)?;

        let count = enc
            .cipher_update(src, Some(&mut *dst))
            .map_err(encrypt_err)?;
        let final_count = enc.cipher_final(&mut dst[count..]).map_err(encrypt_err)?;

        let tag_offset = count + final_count;
        if tag_len > 0 {
            enc.tag(&mut dst[tag_offset..tag_offset + tag_len])
                .map_err(encrypt_err)?;
        }

        Ok(tag_offset + tag_len)
    }

    fn decrypt_in_place(&mut self, buf: &mut [u8], len: usize) -> Result<usize, BenchError> {
        let Active { keys, dec, .. } = self.active.as_mut().ok_or(BenchError::NoCipher)?;
        let suite = keys.suite();
        let body = ciphertext_body(suite, buf.len(), len)?;

        dec.decrypt_init(None, None, Some(keys.nonce()))
            .map_err(decrypt_err)?;

        if suite.is_aead() {
            let mut tag = [0; CipherSuite::MAX_TAG_LEN];
            let tag = &mut tag[..suite.tag_len()];
            tag.copy_from_slice(&buf[body..len]);
            dec.set_tag(tag).map_err(decrypt_err)?;
        }

        let count = dec
            .cipher_update_inplace(&mut buf[..body], body)
            .map_err(decrypt_err)?;
        let final_count = dec
            .cipher_final(&mut buf[count..body])
            .map_err(decrypt_err)?;

        Ok(count + final_count)
    }

    fn free(self: Box<Self>) {
        trace!("Free OpenSSL cipher contexts");
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn active_keys(i: &OsslCipherInstance) -> (Vec<u8>, Vec<u8>) {
        let keys = &i.active.as_ref().unwrap().keys;
        (keys.key().to_vec(), keys.iv().to_vec())
    }

    #[test]
    fn fresh_key_per_set_cipher() {
        let mut i = OsslCipherInstance::new();
        i.set_cipher(CipherSuite::Aes256Gcm).unwrap();
        let (k1, iv1) = active_keys(&i);
        i.set_cipher(CipherSuite::Aes256Gcm).unwrap();
        let (k2, iv2) = active_keys(&i);
        assert_eq!(k1.len(), 32);
        assert_eq!(iv1.len(), 16);
        assert_ne!(k1, k2);
        assert_ne!(iv1, iv2);
    }

    #[test]
    fn repeated_encrypt_is_stable() {
        let mut i = OsslCipherInstance::new();
        i.set_cipher(CipherSuite::ChaCha20Poly1305).unwrap();

        let src = [7_u8; 100];
        let mut a = [0_u8; 116];
        let mut b = [0_u8; 116];
        assert_eq!(i.encrypt(&src, &mut a).unwrap(), 116);
        assert_eq!(i.encrypt(&src, &mut b).unwrap(), 116);
        assert_eq!(a, b);
    }

    #[test]
    fn ctr_has_no_tag() {
        let mut i = OsslCipherInstance::new();
        i.set_cipher(CipherSuite::Aes128Ctr).unwrap();

        let src = [1_u8; 33];
        let mut buf = [0_u8; 33];
        assert_eq!(i.encrypt(&src, &mut buf).unwrap(), 33);
        assert_eq!(i.decrypt_in_place(&mut buf, 33).unwrap(), 33);
        assert_eq!(buf, src);
    }

    #[test]
    fn encrypt_without_cipher() {
        let mut i = OsslCipherInstance::new();
        let mut dst = [0_u8; 32];
        assert_eq!(i.encrypt(&[0; 16], &mut dst), Err(BenchError::NoCipher));
    }
}
