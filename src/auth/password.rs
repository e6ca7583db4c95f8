//! Legacy password verification.
//!
//! Member rows are shared with the PHP site, which keeps writing hashes in
//! its own formats. Verification never rehashes or reports which format
//! matched.

use sha1::{Digest, Sha1};

/// Length of the MySQL `PASSWORD()` format: `*` followed by 40 hex digits.
const DOUBLE_SHA1_LEN: usize = 41;
/// Length of a bare SHA-1 hex digest.
const SHA1_HEX_LEN: usize = 40;

/// Verify a plaintext password against a stored legacy hash.
///
/// The scheme is chosen by the shape of `stored`:
/// - `*` + 40 hex digits: `*` + uppercase hex of SHA1(SHA1(plain)).
/// - 40 characters without `*`: hex SHA1(plain), compared case-insensitively.
/// - anything else: exact equality. Two empty strings match.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    if stored.len() == DOUBLE_SHA1_LEN && stored.starts_with('*') {
        return double_sha1_hash(plain) == stored;
    }

    if stored.len() == SHA1_HEX_LEN && !stored.starts_with('*') {
        return hex::encode(Sha1::digest(plain.as_bytes())).eq_ignore_ascii_case(stored);
    }

    plain == stored
}

/// Produce the MySQL `PASSWORD()` style hash of a plaintext password.
///
/// The inner digest is hashed as raw bytes, not as hex text.
pub fn double_sha1_hash(plain: &str) -> String {
    let once = Sha1::digest(plain.as_bytes());
    let twice = Sha1::digest(once);
    format!("*{}", hex::encode_upper(twice))
}

/// Produce a bare lowercase SHA-1 hex hash.
pub fn sha1_hash(plain: &str) -> String {
    hex::encode(Sha1::digest(plain.as_bytes()))
}
