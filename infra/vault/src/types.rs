use aead::consts::U16;
use aes_gcm::{AesGcm, aes::Aes256};
use serde::{Deserialize, Serialize};

// --- Aliases ---

/// AES-256-GCM instantiated with a 128-bit nonce.
///
/// The persisted schema fixes the IV at 32 hex chars (16 bytes), so the
/// 96-bit default nonce size does not apply here.
pub(crate) type Aes = AesGcm<Aes256, U16>;

// --- Wire format constants ---

/// Raw key length (AES-256).
pub(crate) const KEY_LEN: usize = 32;

/// Key length as configured, in hex characters.
pub(crate) const KEY_HEX_LEN: usize = 64;

/// IV length (128-bit).
pub(crate) const IV_LEN: usize = 16;

/// GCM authentication tag length (128-bit).
pub(crate) const TAG_LEN: usize = 16;

// --- Container ---

/// The hex triple one `encrypt` call produces.
///
/// All three parts belong to the same call and must be stored and given back
/// together; substituting the `iv` or `auth_tag` of another call fails tag
/// verification on decrypt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecret {
    /// Hex-encoded ciphertext.
    pub ciphertext: String,
    /// Hex-encoded 16-byte IV (32 hex chars).
    pub iv: String,
    /// Hex-encoded 16-byte authentication tag (32 hex chars).
    pub auth_tag: String,
}
