//! Shared cryptographic primitives.

pub mod envelope;

pub use envelope::{decrypt_aes256_cbc, derive_key, encrypt_aes256_cbc, CbcEnvelope};
