//! Small shared toolkit for the ReclaimHub crates: identifier generation and
//! layered configuration loading. Nothing in here should pull in heavy
//! dependencies.
//!
//! Item and question identifiers come from [`safe_nanoid!`]:
//! ```rust
//! # use rhub_kernel::safe_nanoid;
//! let item_id = safe_nanoid!();
//! assert_eq!(item_id.len(), 12);
//! let short = safe_nanoid!(6);
//! assert_eq!(short.len(), 6);
//! ```

pub mod config;
pub mod prelude;

/// 55 characters safe for IDs read aloud or retyped from a printed claim
/// ticket. Omits I, O, l, 0 and 1.
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', //
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U',
    'V', 'W', 'X', 'Y', 'Z', //
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v',
    'w', 'x', 'y', 'z',
];

pub use nanoid::nanoid;
pub use rhub_domain as domain;

/// Generates a URL-safe ID over [`SAFE_ALPHABET`], 12 characters unless a
/// length is given.
#[macro_export]
macro_rules! safe_nanoid {
    () => {
        $crate::safe_nanoid!(12)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}
