//! AES-256-CBC envelope for values written to disk.
//!
//! An envelope is the base64 (standard alphabet) encoding of:
//!
//! ```text
//! "001" | random key (32 bytes) | IV (16 bytes) | AES-256-CBC ciphertext
//! ```
//!
//! The AES key is derived from the random key with PBKDF2-HMAC-SHA256
//! (1000 iterations, 32-byte output) using a caller-supplied salt. Padding is
//! PKCS#7 (identical to PKCS#5 for a 16-byte block).
//!
//! The random key travels with the ciphertext, so confidentiality depends on
//! the salt staying private.
//!
//! ## Usage
//!
//! ```rust
//! use secretcache_common::crypto::CbcEnvelope;
//!
//! let envelope = CbcEnvelope::new("my-salt")?;
//! let sealed = envelope.seal(b"db-password")?;
//! assert_eq!(envelope.open(&sealed)?, b"db-password");
//! # Ok::<(), secretcache_common::error::CommonError>(())
//! ```

use aes::Aes256;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::error::{CommonError, CommonResult};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Literal bytes identifying the AES-256-CBC envelope layout.
pub const MODE_MARKER: &[u8; 3] = b"001";
/// Length of the random per-write key.
pub const RANDOM_KEY_LENGTH: usize = 32;
/// Length of the CBC initialization vector.
pub const IV_LENGTH: usize = 16;
/// PBKDF2 iteration count.
pub const ITERATION_COUNT: u32 = 1000;
/// Length of the derived AES key.
pub const KEY_LENGTH: usize = 32;

const HEADER_LENGTH: usize = MODE_MARKER.len() + RANDOM_KEY_LENGTH + IV_LENGTH;

/// Derive the AES key from `secret` and `salt` with PBKDF2-HMAC-SHA256.
pub fn derive_key(secret: &[u8], salt: &[u8]) -> [u8; KEY_LENGTH] {
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::pbkdf2_hmac::<Sha256>(secret, salt, ITERATION_COUNT, &mut key);
    key
}

/// Encrypt `data` with AES-256-CBC/PKCS#7 under a key derived from `secret`.
pub fn encrypt_aes256_cbc(
    data: &[u8],
    secret: &[u8],
    iv: &[u8],
    salt: &[u8],
) -> CommonResult<Vec<u8>> {
    let key = derive_key(secret, salt);
    let cipher = Aes256CbcEnc::new_from_slices(&key, iv)
        .map_err(|e| CommonError::crypto(format!("Failed to create cipher: {e}")))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(data))
}

/// Reverse of [`encrypt_aes256_cbc`].
pub fn decrypt_aes256_cbc(
    data: &[u8],
    secret: &[u8],
    iv: &[u8],
    salt: &[u8],
) -> CommonResult<Vec<u8>> {
    let key = derive_key(secret, salt);
    let cipher = Aes256CbcDec::new_from_slices(&key, iv)
        .map_err(|e| CommonError::crypto(format!("Failed to create cipher: {e}")))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(data)
        .map_err(|e| CommonError::crypto(format!("Decryption failed: {e}")))
}

/// Seals and opens envelopes under a fixed salt.
#[derive(Clone)]
pub struct CbcEnvelope {
    salt: Vec<u8>,
}

impl std::fmt::Debug for CbcEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CbcEnvelope").field("salt", &"[REDACTED]").finish()
    }
}

impl CbcEnvelope {
    /// Create an envelope bound to `salt`, which must not be empty.
    pub fn new(salt: impl AsRef<[u8]>) -> CommonResult<Self> {
        let salt = salt.as_ref();
        if salt.is_empty() {
            return Err(CommonError::validation("salt", "the argument salt must not be empty"));
        }
        Ok(Self { salt: salt.to_vec() })
    }

    /// Generate a random 32-byte per-write key.
    pub fn generate_random_key() -> [u8; RANDOM_KEY_LENGTH] {
        let mut key = [0u8; RANDOM_KEY_LENGTH];
        OsRng.fill_bytes(&mut key);
        key
    }

    fn generate_iv() -> [u8; IV_LENGTH] {
        let mut iv = [0u8; IV_LENGTH];
        OsRng.fill_bytes(&mut iv);
        iv
    }

    /// Encrypt `plaintext` with a fresh random key and IV.
    pub fn seal(&self, plaintext: &[u8]) -> CommonResult<String> {
        self.seal_with(plaintext, &Self::generate_random_key(), &Self::generate_iv())
    }

    fn seal_with(
        &self,
        plaintext: &[u8],
        key: &[u8; RANDOM_KEY_LENGTH],
        iv: &[u8; IV_LENGTH],
    ) -> CommonResult<String> {
        let ciphertext = encrypt_aes256_cbc(plaintext, key, iv, &self.salt)?;

        let mut blob = Vec::with_capacity(HEADER_LENGTH + ciphertext.len());
        blob.extend_from_slice(MODE_MARKER);
        blob.extend_from_slice(key);
        blob.extend_from_slice(iv);
        blob.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(blob))
    }

    /// Decode and decrypt an envelope produced by [`seal`](Self::seal).
    ///
    /// Malformed input (bad base64, unknown marker, truncated header) is
    /// reported as a validation or serialization error; a wrong salt or
    /// corrupted ciphertext surfaces as a crypto error.
    pub fn open(&self, encoded: &str) -> CommonResult<Vec<u8>> {
        let blob = BASE64
            .decode(encoded.trim())
            .map_err(|e| CommonError::serialization_format("base64", e.to_string()))?;

        if blob.len() < HEADER_LENGTH {
            return Err(CommonError::validation(
                "envelope",
                format!("expected at least {HEADER_LENGTH} bytes, got {}", blob.len()),
            ));
        }
        let (marker, rest) = blob.split_at(MODE_MARKER.len());
        if marker != MODE_MARKER {
            return Err(CommonError::validation("envelope", "unknown encryption mode marker"));
        }
        let (key, rest) = rest.split_at(RANDOM_KEY_LENGTH);
        let (iv, ciphertext) = rest.split_at(IV_LENGTH);

        decrypt_aes256_cbc(ciphertext, key, iv, &self.salt)
    }
}
