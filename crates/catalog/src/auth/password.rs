//! Password digests.
//!
//! A single unsalted SHA-256 digest, hex encoded. This is a fast hash and
//! offers no protection against offline guessing if the catalog file
//! leaks; it is kept for compatibility with existing user records.

use sha2::{Digest, Sha256};

pub fn digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub fn matches(password: &str, stored_hash: &str) -> bool {
    digest(password) == stored_hash
}
