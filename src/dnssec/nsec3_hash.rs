//! NSEC3 owner-name hashing (RFC 5155 §5): shared by the negative-validation
//! walk (§4.3.2) and by a zone's own NSEC3PARAM-driven name hashing. Kept as
//! its own module since both call sites need the identical iterated-hash
//! algorithm.

use crate::dns::labels::DomainName;
use crate::dns::rdata::sec::nsec3::HASH_ALGORITHM_SHA1;
use crate::error::{DnsError, DnsResult};
use sha1::{Digest, Sha1};

/// `IH(salt, x, 0) = H(x || salt)`, `IH(salt, x, k) = H(IH(salt, x, k-1) || salt)`,
/// hash = `IH(salt, owner name, iterations)` (RFC 5155 §5). `name` must
/// already be in canonical (lowercased, uncompressed) wire form.
pub fn nsec3_hash(
    name: &DomainName,
    algorithm: u8,
    iterations: u16,
    salt: &[u8],
) -> DnsResult<Vec<u8>> {
    if algorithm != HASH_ALGORITHM_SHA1 {
        return Err(DnsError::format(format!(
            "unsupported NSEC3 hash algorithm {algorithm}"
        )));
    }
    let mut wire = Vec::new();
    name.canonical().encode_uncompressed(&mut wire, true);

    let mut digest = {
        let mut hasher = Sha1::new();
        hasher.update(&wire);
        hasher.update(salt);
        hasher.finalize().to_vec()
    };
    for _ in 0..iterations {
        let mut hasher = Sha1::new();
        hasher.update(&digest);
        hasher.update(salt);
        digest = hasher.finalize().to_vec();
    }
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_iterations_hashes_once() {
        let name = DomainName::from_text("example.com.").unwrap();
        let hash = nsec3_hash(&name, HASH_ALGORITHM_SHA1, 0, &[]).unwrap();
        assert_eq!(hash.len(), 20);
    }

    #[test]
    fn iterations_change_the_hash() {
        let name = DomainName::from_text("example.com.").unwrap();
        let zero = nsec3_hash(&name, HASH_ALGORITHM_SHA1, 0, &[0xAB]).unwrap();
        let twelve = nsec3_hash(&name, HASH_ALGORITHM_SHA1, 12, &[0xAB]).unwrap();
        assert_ne!(zero, twelve);
    }

    #[test]
    fn unsupported_algorithm_is_rejected() {
        let name = DomainName::from_text("example.com.").unwrap();
        assert!(nsec3_hash(&name, 99, 0, &[]).is_err());
    }
}
