use aead::inout::InOutBuf;
use aead::{AeadInOut, Key, KeyInit, Nonce};
use getrandom::fill;
use std::borrow::Cow;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::builder::VaultBuilder;
use crate::error::VaultError;
use crate::types::{Aes, EncryptedSecret, IV_LEN, KEY_HEX_LEN, KEY_LEN, TAG_LEN};

/// Default environment variable consulted for the encryption key.
pub const DEFAULT_KEY_ENV: &str = "RHUB_ENCRYPTION_KEY";

/// Where the vault obtains its 64-hex-character key on each call.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) enum KeySource {
    /// Read from the named environment variable on every call, so key
    /// rotation takes effect without a process restart.
    Env(#[zeroize(skip)] Cow<'static, str>),
    /// An injected hex string. Still validated on every call.
    Hex(String),
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env(var) => f.debug_tuple("Env").field(var).finish(),
            Self::Hex(_) => f.debug_tuple("Hex").field(&"<redacted>").finish(),
        }
    }
}

/// Decoded key bytes, wiped from memory when the call finishes.
#[derive(Zeroize, ZeroizeOnDrop)]
struct SecretKey([u8; KEY_LEN]);

/// Authenticated-encryption vault for a single secret string per call.
///
/// `Vault` is cheap to clone and safe to share across threads or async tasks;
/// it holds only the key *source*, never a decoded key. See the crate docs for
/// the key and IV policies.
#[derive(Clone)]
pub struct Vault {
    pub(crate) key_source: KeySource,
}

impl fmt::Debug for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key_source {
            KeySource::Env(var) => f.debug_struct("Vault").field("key_env", var).finish(),
            KeySource::Hex(_) => f.debug_struct("Vault").field("key", &"<redacted>").finish(),
        }
    }
}

impl Vault {
    /// Returns a new [`VaultBuilder`] to configure the vault.
    #[must_use]
    pub fn builder() -> VaultBuilder {
        VaultBuilder::new()
    }

    /// Shorthand for a vault reading [`DEFAULT_KEY_ENV`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::builder().key_env(DEFAULT_KEY_ENV).build()
    }

    /// Encrypts a plaintext secret.
    ///
    /// A fresh random 16-byte IV is generated for every call, so two calls
    /// with identical plaintext produce different ciphertexts. Empty strings,
    /// multi-kilobyte strings, and arbitrary Unicode all round-trip exactly.
    ///
    /// # Errors
    /// * [`VaultError::Configuration`] if the key is missing, has the wrong
    ///   length, or is not valid hex.
    /// * [`VaultError::Encryption`] if the AEAD encryption fails.
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedSecret, VaultError> {
        let key = self.resolve_key()?;
        let cipher = Self::init_cipher(&key)?;

        let mut iv = Nonce::<Aes>::default();
        fill(&mut iv).map_err(|_| VaultError::Encryption {
            message: "System RNG unavailable for IV generation".into(),
            context: None,
        })?;

        let mut buf = plaintext.as_bytes().to_vec();
        let in_out = InOutBuf::from(&mut buf[..]);

        let tag = cipher.encrypt_inout_detached(&iv, b"", in_out).map_err(|_| {
            VaultError::Encryption { message: "AEAD encryption failed".into(), context: None }
        })?;

        Ok(EncryptedSecret {
            ciphertext: hex::encode(&buf),
            iv: hex::encode(iv),
            auth_tag: hex::encode(tag),
        })
    }

    /// Decrypts a stored secret triple back into the plaintext answer.
    ///
    /// # Errors
    /// * [`VaultError::Configuration`] if the key is missing or malformed.
    /// * [`VaultError::MalformedInput`] if the ciphertext, IV, or tag is not
    ///   valid hex, the IV or tag has the wrong length, or the decrypted
    ///   bytes are not valid UTF-8.
    /// * [`VaultError::AuthenticationFailed`] if tag verification fails
    ///   (tampered data and a wrong key are indistinguishable here).
    pub fn decrypt(&self, secret: &EncryptedSecret) -> Result<String, VaultError> {
        self.decrypt_parts(&secret.ciphertext, &secret.iv, &secret.auth_tag)
    }

    /// Decrypts from the individual hex parts as persisted in the relational
    /// columns. See [`Vault::decrypt`] for failure modes.
    pub fn decrypt_parts(
        &self,
        ciphertext: &str,
        iv: &str,
        auth_tag: &str,
    ) -> Result<String, VaultError> {
        let key = self.resolve_key()?;
        let cipher = Self::init_cipher(&key)?;

        let iv_bytes = hex::decode(iv).map_err(|_| VaultError::MalformedInput {
            message: "IV is not valid hex".into(),
            context: None,
        })?;
        if iv_bytes.len() != IV_LEN {
            return Err(VaultError::MalformedInput {
                message: format!("IV must be {IV_LEN} bytes, got {}", iv_bytes.len()).into(),
                context: None,
            });
        }

        let tag_bytes = hex::decode(auth_tag).map_err(|_| VaultError::MalformedInput {
            message: "Authentication tag is not valid hex".into(),
            context: None,
        })?;
        if tag_bytes.len() != TAG_LEN {
            return Err(VaultError::MalformedInput {
                message: format!("Authentication tag must be {TAG_LEN} bytes, got {}", tag_bytes.len())
                    .into(),
                context: None,
            });
        }

        let mut buf = hex::decode(ciphertext).map_err(|_| VaultError::MalformedInput {
            message: "Ciphertext is not valid hex".into(),
            context: None,
        })?;

        let nonce = iv_bytes.as_slice().try_into().map_err(|_| VaultError::MalformedInput {
            message: "Invalid IV length".into(),
            context: None,
        })?;
        let tag = tag_bytes.as_slice().try_into().map_err(|_| VaultError::MalformedInput {
            message: "Invalid tag length".into(),
            context: None,
        })?;

        let in_out = InOutBuf::from(&mut buf[..]);
        cipher.decrypt_inout_detached(&nonce, b"", in_out, &tag).map_err(|_| {
            VaultError::AuthenticationFailed {
                message: "Tag mismatch: tampered data or wrong key".into(),
                context: None,
            }
        })?;

        String::from_utf8(buf).map_err(|_| VaultError::MalformedInput {
            message: "Decrypted bytes are not valid UTF-8".into(),
            context: None,
        })
    }

    /// Resolves and validates the configured key. Runs on every call; the
    /// three failure modes carry distinct messages.
    fn resolve_key(&self) -> Result<SecretKey, VaultError> {
        let mut hex_key = match &self.key_source {
            KeySource::Env(var) => {
                std::env::var(var.as_ref()).map_err(|_| VaultError::Configuration {
                    message: "Encryption key is not set".into(),
                    context: Some(var.clone()),
                })?
            },
            KeySource::Hex(key) => key.clone(),
        };

        if hex_key.len() != KEY_HEX_LEN {
            let got = hex_key.len();
            hex_key.zeroize();
            return Err(VaultError::Configuration {
                message: format!(
                    "Encryption key must be exactly {KEY_HEX_LEN} hexadecimal characters, got {got}"
                )
                .into(),
                context: None,
            });
        }

        let decoded = hex::decode(&hex_key);
        hex_key.zeroize();
        let mut decoded = decoded.map_err(|_| VaultError::Configuration {
            message: "Encryption key is not valid hexadecimal".into(),
            context: None,
        })?;

        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(SecretKey(key))
    }

    fn init_cipher(key: &SecretKey) -> Result<Aes, VaultError> {
        let key = Key::<Aes>::try_from(&key.0[..]).map_err(|_| VaultError::Configuration {
            message: "Invalid key length, must be 32 bytes".into(),
            context: None,
        })?;
        Ok(Aes::new(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn setup_vault() -> Vault {
        Vault::builder().key_hex(KEY).build()
    }

    #[test]
    fn test_roundtrip() {
        let vault = setup_vault();
        let secret = vault.encrypt("red backpack, broken strap").unwrap();
        assert_eq!(vault.decrypt(&secret).unwrap(), "red backpack, broken strap");
    }

    #[test]
    fn test_fresh_iv_per_call() {
        let vault = setup_vault();
        let a = vault.encrypt("same answer").unwrap();
        let b = vault.encrypt("same answer").unwrap();

        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
        assert_eq!(vault.decrypt(&a).unwrap(), "same answer");
        assert_eq!(vault.decrypt(&b).unwrap(), "same answer");
    }

    #[test]
    fn test_iv_and_tag_are_hex_encoded_16_bytes() {
        let vault = setup_vault();
        let secret = vault.encrypt("x").unwrap();
        assert_eq!(secret.iv.len(), 32);
        assert_eq!(secret.auth_tag.len(), 32);
    }

    #[test]
    fn test_mixed_parts_fail_authentication() {
        let vault = setup_vault();
        let a = vault.encrypt("first").unwrap();
        let b = vault.encrypt("first").unwrap();

        let result = vault.decrypt_parts(&a.ciphertext, &b.iv, &a.auth_tag);
        assert!(matches!(result, Err(VaultError::AuthenticationFailed { .. })));
    }
}
