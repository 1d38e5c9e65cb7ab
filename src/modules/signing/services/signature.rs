//! Deterministic request signing.
//!
//! Wire-format contract (fixed by the provider, do not change): the secret
//! key and every field are joined with `'|'` in a documented order, hashed
//! with SHA-256, and emitted as 64 lowercase hex characters. The separator
//! is reserved and must not appear inside any field value; together with
//! the fixed order it prevents concatenation-ambiguity forgeries where
//! characters shift between adjacent fields.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Reserved field separator for the signed concatenation
pub const FIELD_SEPARATOR: char = '|';

/// Computes the signature over `secret` followed by `fields` in the given
/// order.
///
/// Equivalent to `sha256("{secret}|{field_1}|...|{field_n}")` in hex, but
/// streamed so the joined string is never materialized.
pub fn sign(secret: &str, fields: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    for field in fields {
        hasher.update([FIELD_SEPARATOR as u8]);
        hasher.update(field.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Recomputes the signature and compares it against `signature` in constant
/// time.
///
/// Timing-attack resistance is a correctness requirement here, not an
/// optimization: the comparison must not leak how many leading characters
/// of a guessed signature were right.
pub fn verify(secret: &str, fields: &[&str], signature: &str) -> bool {
    let expected = sign(secret, fields);
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}
