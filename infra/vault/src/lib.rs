//! A thread-safe authenticated-encryption vault for claimant-verification
//! secrets.
//!
//! The vault encrypts a single secret string per call with AES-256-GCM and a
//! fresh random 16-byte IV, producing the hex `ciphertext`/`iv`/`auth_tag`
//! triple the relational schema persists. Decryption reconstructs the cipher
//! from the same triple and verifies the authentication tag.
//!
//! ## Key policy
//!
//! The 256-bit key arrives as a 64-character hexadecimal string, normally
//! through an environment variable. The key is **re-resolved and re-validated
//! on every call**: rotation takes effect without a process restart, and a
//! missing or malformed key is fatal only when encryption is actually
//! invoked. Decoded key bytes are zeroized after each use and never logged or
//! embedded in errors.
//!
//! ## IV policy
//!
//! Every encryption uses a random 128-bit IV from the system RNG. Two calls
//! with identical plaintext therefore produce different IVs and different
//! ciphertexts. The `iv` and `auth_tag` of one call belong together; mixing
//! parts from different calls fails tag verification instead of silently
//! corrupting data.
//!
//! ## Example
//!
//! ```rust
//! use rhub_vault::prelude::*;
//!
//! # fn main() -> Result<(), VaultError> {
//! let vault = Vault::builder()
//!     .key_hex("a".repeat(64))
//!     .build();
//!
//! let secret = vault.encrypt("the lining is torn near the zipper")?;
//! let answer = vault.decrypt(&secret)?;
//! assert_eq!(answer, "the lining is torn near the zipper");
//! # Ok(())
//! # }
//! ```

mod builder;
mod engine;
mod error;
mod types;

pub use builder::VaultBuilder;
pub use engine::{DEFAULT_KEY_ENV, Vault};
pub use error::{VaultError, VaultErrorExt};
pub use types::EncryptedSecret;

pub mod prelude {
    pub use crate::builder::VaultBuilder;
    pub use crate::engine::{DEFAULT_KEY_ENV, Vault};
    pub use crate::error::{VaultError, VaultErrorExt};
    pub use crate::types::EncryptedSecret;
}
