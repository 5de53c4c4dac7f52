//! Cryptographic primitives for the commit-reveal game.
//!
//! This module provides:
//! - Digest, the SHA-256 binding of a disclosed value
//! - Salt and Disclosure, the canonical client-side encoding of a move

mod commitment;

pub use commitment::{Digest, Disclosure, Salt, DISCLOSURE_LEN, SALT_LEN};
