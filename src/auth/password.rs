/// Password Hashing
///
/// Deterministic salted digest used for equality lookup in the user store.
/// The same password and secret always produce the same digest, so the store
/// can match credentials with a plain `WHERE password_hash = $2`.

use sha2::{Digest, Sha256};

/// Hash a password with the process-wide password secret
///
/// The secret is fed into SHA-256 ahead of the password. The result is a
/// 64-character lowercase hex string.
pub fn hash_password(password: &str, secret: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
