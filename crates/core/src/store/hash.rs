//! Search cache key generation.

use sha2::{Digest, Sha256};

/// Compute the cache fingerprint for a search request.
///
/// The query is trimmed and lower-cased before hashing, so `"  Dune "` and
/// `"dune"` share an entry. Page and page size are part of the digest input.
pub fn compute_search_key(query: &str, page: u32, page_size: u32) -> String {
    let normalized = query.trim().to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(format!("{normalized}:{page}:{page_size}").as_bytes());
    hex::encode(hasher.finalize())
}
