//! encryption module
//!
//! AES-256-GCM sealing of credential blobs at rest. Every record carries its
//! own 128-bit nonce and detached 128-bit authentication tag, all hex encoded
//! so the store file stays plain JSON.

use std::fmt;

use aes_gcm::{
    aead::{consts::U16, AeadInPlace, KeyInit},
    aes::Aes256,
    AesGcm, Nonce, Tag,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CoreError, CoreResult};

/// AES-256 key length in bytes
pub const KEY_LENGTH: usize = 32;
const NONCE_LENGTH: usize = 16;
const TAG_LENGTH: usize = 16;

/// AES-256-GCM with a 128-bit nonce
type ProfileCipher = AesGcm<Aes256, U16>;

/// The single long-lived symmetric key protecting every profile.
///
/// Wiped from memory on drop; `Debug` never prints the bytes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; KEY_LENGTH]);

impl MasterKey {
    /// Generate a fresh random key from the OS-seeded CSPRNG
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LENGTH];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse a hex encoded key; `None` unless it is exactly 32 bytes of hex
    #[must_use]
    pub fn from_hex(encoded: &str) -> Option<Self> {
        let mut bytes = [0u8; KEY_LENGTH];
        match hex::decode_to_slice(encoded.trim(), &mut bytes) {
            Ok(()) => Some(Self(bytes)),
            Err(_) => {
                bytes.zeroize();
                None
            }
        }
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    fn cipher(&self) -> CoreResult<ProfileCipher> {
        ProfileCipher::new_from_slice(&self.0)
            .map_err(|e| CoreError::Serialization(format!("Failed to create cipher: {e}")))
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}

/// Output of [`seal`]: ciphertext, nonce and tag, each hex encoded.
///
/// Field names on disk are kept compatible with existing `profiles.json` files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedRecord {
    #[serde(rename = "encryptedCredentials")]
    pub ciphertext: String,
    #[serde(rename = "iv")]
    pub nonce: String,
    #[serde(rename = "authTag")]
    pub auth_tag: String,
}

/// Encrypt `plaintext` under `key` with a freshly generated nonce.
pub fn seal(plaintext: &[u8], key: &MasterKey) -> CoreResult<EncryptedRecord> {
    let mut nonce_bytes = [0u8; NONCE_LENGTH];
    rand::rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::<U16>::from_slice(&nonce_bytes);

    let mut buffer = plaintext.to_vec();
    let tag = key
        .cipher()?
        .encrypt_in_place_detached(nonce, b"", &mut buffer)
        .map_err(|e| {
            buffer.zeroize();
            CoreError::Serialization(format!("Encryption failed: {e}"))
        })?;

    Ok(EncryptedRecord {
        ciphertext: hex::encode(&buffer),
        nonce: hex::encode(nonce_bytes),
        auth_tag: hex::encode(tag),
    })
}

/// Decrypt and authenticate `record`.
///
/// Any failure (bad hex, wrong lengths, tag mismatch) is reported as
/// [`CoreError::Integrity`] and no plaintext leaves this function.
pub fn open(record: &EncryptedRecord, key: &MasterKey) -> CoreResult<Vec<u8>> {
    let mut buffer = hex::decode(&record.ciphertext).map_err(|_| CoreError::Integrity)?;
    let nonce_bytes = hex::decode(&record.nonce).map_err(|_| CoreError::Integrity)?;
    let tag_bytes = hex::decode(&record.auth_tag).map_err(|_| CoreError::Integrity)?;

    if nonce_bytes.len() != NONCE_LENGTH || tag_bytes.len() != TAG_LENGTH {
        return Err(CoreError::Integrity);
    }

    let nonce = Nonce::<U16>::from_slice(&nonce_bytes);
    let tag = Tag::from_slice(&tag_bytes);

    // The in-place decrypt overwrites `buffer` even when the tag check fails.
    if key
        .cipher()?
        .decrypt_in_place_detached(nonce, b"", &mut buffer, tag)
        .is_err()
    {
        buffer.zeroize();
        return Err(CoreError::Integrity);
    }

    Ok(buffer)
}
