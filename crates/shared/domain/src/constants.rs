//! Platform-wide constants shared across slices.

/// Environment variable holding the 64-hex-character AES-256 key.
///
/// There is no default value. Absence is fatal only when encryption is
/// actually invoked, never at process start.
pub const ENCRYPTION_KEY_ENV: &str = "RHUB_ENCRYPTION_KEY";

/// Expected length of the configured encryption key, in hex characters.
pub const ENCRYPTION_KEY_HEX_LEN: usize = 64;

/// Minimum number of options for a multiple-choice question.
pub const MIN_QUESTION_OPTIONS: usize = 2;

/// Maximum number of options for a multiple-choice question.
pub const MAX_QUESTION_OPTIONS: usize = 6;
