//! Method signatures (`api_sig`) for authenticated calls.
//!
//! Flow: sort pairs by key (byte order) → concat `key` + `value` with no
//! separators → append the shared secret → MD5 → lowercase hex.

use md5::{Digest, Md5};

/// Reserved parameter key carrying the signature.
pub const SIGNATURE_KEY: &str = "api_sig";

/// Sort `pairs` by key in byte order, in place.
pub fn sort_pairs(pairs: &mut [(String, String)]) {
    pairs.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
}

/// Compute the signature over `pairs` and `secret`.
///
/// `pairs` may be in any order; they are signed in sorted order.
pub fn sign(pairs: &[(String, String)], secret: &str) -> String {
    let mut sorted = pairs.to_vec();
    sort_pairs(&mut sorted);

    let mut hasher = Md5::new();
    for (key, value) in &sorted {
        hasher.update(key.as_bytes());
        hasher.update(value.as_bytes());
    }
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}
