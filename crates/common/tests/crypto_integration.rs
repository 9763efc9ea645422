//! Integration tests for crypto module
//!
//! Validates the at-rest envelope across independent instances, the wire
//! layout other readers rely on, and failure reporting for tampered input.

#![cfg(feature = "runtime")]

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use secretcache_common::crypto::{decrypt_aes256_cbc, encrypt_aes256_cbc};
use secretcache_common::{CbcEnvelope, CommonError};

/// Round-trip across distinct envelope instances sharing only the salt.
#[test]
fn envelope_round_trip_across_instances() {
    let writer = CbcEnvelope::new("cache-salt").expect("writer should init");
    let reader = CbcEnvelope::new("cache-salt").expect("reader should init");

    let plaintext = "{\"user\":\"app\",\"password\":\"s3cr3t\"}";
    let sealed = writer.seal(plaintext.as_bytes()).expect("seal should succeed");
    let opened = reader.open(&sealed).expect("open should succeed");

    assert_eq!(String::from_utf8(opened).expect("utf8"), plaintext);
}

/// The envelope is decryptable by hand from its documented layout.
#[test]
fn envelope_segments_decrypt_with_low_level_primitives() {
    let envelope = CbcEnvelope::new("layout-salt").expect("init");
    let sealed = envelope.seal(b"manual").expect("seal");
    let blob = BASE64.decode(sealed).expect("base64");

    let key = &blob[3..35];
    let iv = &blob[35..51];
    let ciphertext = &blob[51..];
    let plaintext =
        decrypt_aes256_cbc(ciphertext, key, iv, b"layout-salt").expect("manual decrypt");
    assert_eq!(plaintext, b"manual");
}

/// Encrypting with the primitives and assembling the blob by hand is accepted
/// by `open`.
#[test]
fn hand_assembled_blob_opens() {
    let key = [3u8; 32];
    let iv = [4u8; 16];
    let ciphertext = encrypt_aes256_cbc(b"assembled", &key, &iv, b"s").expect("encrypt");

    let mut blob = b"001".to_vec();
    blob.extend_from_slice(&key);
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&ciphertext);

    let envelope = CbcEnvelope::new("s").expect("init");
    assert_eq!(envelope.open(&BASE64.encode(blob)).expect("open"), b"assembled");
}

/// A different salt must never reproduce the plaintext.
#[test]
fn wrong_salt_does_not_reveal_plaintext() {
    let sealed = CbcEnvelope::new("right").expect("init").seal(b"top secret value").expect("seal");
    let result = CbcEnvelope::new("wrong").expect("init").open(&sealed);

    match result {
        Ok(bytes) => assert_ne!(bytes, b"top secret value"),
        Err(err) => assert!(matches!(err, CommonError::Crypto { .. })),
    }
}

/// Truncated ciphertext (not a whole block) is a crypto failure, not a panic.
#[test]
fn truncated_ciphertext_is_reported() {
    let envelope = CbcEnvelope::new("salt").expect("init");
    let sealed = envelope.seal(b"sixteen byte msg").expect("seal");
    let mut blob = BASE64.decode(sealed).expect("base64");
    blob.truncate(blob.len() - 5);

    let err = envelope.open(&BASE64.encode(blob)).expect_err("must fail");
    assert!(matches!(err, CommonError::Crypto { .. }));
}
