//! Cryptographic primitive provider: `verify`/`digest` as consumed by the
//! DNSSEC validator. The validator never touches a signature byte itself —
//! it hands `(algorithm, pubkey_bytes, data_bytes, signature_bytes)` to a
//! [`SignatureVerifier`] and a `(digest_type, data)` pair to a
//! [`DigestProvider`].
//!
//! [`DefaultCryptoProvider`] implements both traits on top of `rsa`, `dsa`,
//! `sha1` and `sha2`, and therefore only supports the algorithms those
//! crates cover: RSA/SHA-1/256/512 and DSA/SHA-1 for signatures, SHA-1/256/
//! 384 for digests. ECDSA, Ed25519, Ed448 and GOST are modeled in the
//! algorithm number space but report `Err` rather than `Ok(false)`, so the
//! validator treats them as unusable keys rather than mistaking a missing
//! implementation for a bad signature. An embedder who needs those
//! algorithms supplies their own [`SignatureVerifier`] (e.g. backed by
//! `ring` or `ed25519-dalek`); the validator is generic over the trait,
//! never over this concrete type.

use crate::dns::rdata::sec::algo::{
    self, DNSSecAlgorithm, DigestAlgorithm, DIGEST_SHA1, DIGEST_SHA256, DIGEST_SHA384,
};
use crate::error::{DnsError, DnsResult};
use rsa::{BigUint, Pkcs1v15Sign, RsaPublicKey};
use sha1::{Digest as _, Sha1};
use sha2::{Sha256, Sha384, Sha512};

/// Verifies a signature over arbitrary data given a raw on-wire public key
/// (the DNSKEY RDATA's Public Key field) and algorithm number.
pub trait SignatureVerifier {
    /// `Ok(true)`/`Ok(false)` is a completed verification; `Err` means the
    /// provider could not attempt verification at all (malformed key,
    /// unsupported algorithm) and the validator must treat the candidate
    /// key as unusable rather than as a failed signature.
    fn verify(
        &self,
        algorithm: DNSSecAlgorithm,
        pubkey: &[u8],
        data: &[u8],
        signature: &[u8],
    ) -> DnsResult<bool>;

    fn supports(&self, algorithm: DNSSecAlgorithm) -> bool;
}

/// Computes a digest over arbitrary data, used for the DS/CDS digest
/// (`hash(owner canonical name || DNSKEY RDATA)`, RFC 4034 §5.1.4) and for
/// NSEC3 owner-name hashing.
pub trait DigestProvider {
    fn digest(&self, digest_type: DigestAlgorithm, data: &[u8]) -> DnsResult<Vec<u8>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCryptoProvider;

impl DefaultCryptoProvider {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureVerifier for DefaultCryptoProvider {
    fn verify(
        &self,
        algorithm: DNSSecAlgorithm,
        pubkey: &[u8],
        data: &[u8],
        signature: &[u8],
    ) -> DnsResult<bool> {
        use algo::*;
        match algorithm {
            ALGORITHM_RSASHA1 | ALGORITHM_RSASHA1_NSEC3_SHA1 => {
                let key = parse_rsa_pubkey(pubkey)?;
                let hashed = Sha1::digest(data);
                Ok(key
                    .verify(Pkcs1v15Sign::new::<Sha1>(), &hashed, signature)
                    .is_ok())
            }
            ALGORITHM_RSASHA256 => {
                let key = parse_rsa_pubkey(pubkey)?;
                let hashed = Sha256::digest(data);
                Ok(key
                    .verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, signature)
                    .is_ok())
            }
            ALGORITHM_RSASHA512 => {
                let key = parse_rsa_pubkey(pubkey)?;
                let hashed = Sha512::digest(data);
                Ok(key
                    .verify(Pkcs1v15Sign::new::<Sha512>(), &hashed, signature)
                    .is_ok())
            }
            ALGORITHM_DSA | ALGORITHM_DSA_NSEC3_SHA1 => verify_dsa(pubkey, data, signature),
            ALGORITHM_RSAMD5 => Err(DnsError::format(
                "RSA/MD5 (algorithm 1) is deprecated and not verifiable by this provider",
            )),
            other => Err(DnsError::format(format!(
                "unsupported DNSSEC algorithm {other} ({})",
                algo::algorithm_name(other)
            ))),
        }
    }

    fn supports(&self, algorithm: DNSSecAlgorithm) -> bool {
        use algo::*;
        matches!(
            algorithm,
            ALGORITHM_RSASHA1
                | ALGORITHM_RSASHA1_NSEC3_SHA1
                | ALGORITHM_RSASHA256
                | ALGORITHM_RSASHA512
                | ALGORITHM_DSA
                | ALGORITHM_DSA_NSEC3_SHA1
        )
    }
}

impl DigestProvider for DefaultCryptoProvider {
    fn digest(&self, digest_type: DigestAlgorithm, data: &[u8]) -> DnsResult<Vec<u8>> {
        match digest_type {
            DIGEST_SHA1 => Ok(Sha1::digest(data).to_vec()),
            DIGEST_SHA256 => Ok(Sha256::digest(data).to_vec()),
            DIGEST_SHA384 => Ok(Sha384::digest(data).to_vec()),
            other => Err(DnsError::format(format!(
                "unsupported digest algorithm {other}"
            ))),
        }
    }
}

/// Parses RFC 3110's RSA public key wire format: a one-octet exponent
/// length (or, per RFC 3110 §2, a zero octet followed by a two-octet
/// length when the exponent is longer than 255 bytes), the exponent, then
/// the modulus filling the remainder. Malformed headers are rejected
/// rather than silently truncated.
fn parse_rsa_pubkey(pubkey: &[u8]) -> DnsResult<RsaPublicKey> {
    if pubkey.is_empty() {
        return Err(DnsError::format("empty RSA public key"));
    }
    let (exponent_len, rest) = if pubkey[0] == 0 {
        if pubkey.len() < 3 {
            return Err(DnsError::format(
                "RSA public key declares extended exponent length but is truncated",
            ));
        }
        let len = u16::from_be_bytes([pubkey[1], pubkey[2]]) as usize;
        (len, &pubkey[3..])
    } else {
        (pubkey[0] as usize, &pubkey[1..])
    };
    if exponent_len == 0 || exponent_len > rest.len() {
        return Err(DnsError::format(
            "RSA public key exponent length exceeds available bytes",
        ));
    }
    let (exponent, modulus) = rest.split_at(exponent_len);
    if modulus.is_empty() {
        return Err(DnsError::format("RSA public key has an empty modulus"));
    }
    let e = BigUint::from_bytes_be(exponent);
    let n = BigUint::from_bytes_be(modulus);
    RsaPublicKey::new(n, e).map_err(|err| DnsError::format(format!("invalid RSA public key: {err}")))
}

/// Parses RFC 2536's DSA public key wire format: a one-octet `T` selecting
/// the modulus size (`64 + T*8` bytes for P and G), followed by Q (20
/// bytes, SHA-1 sized), P, G, then Y.
fn parse_dsa_pubkey(pubkey: &[u8]) -> DnsResult<dsa::VerifyingKey> {
    if pubkey.is_empty() {
        return Err(DnsError::format("empty DSA public key"));
    }
    let t = pubkey[0] as usize;
    let modlen = 64 + t * 8;
    let want = 1 + 20 + modlen * 3;
    if pubkey.len() != want {
        return Err(DnsError::format("DSA public key length does not match T"));
    }
    let mut offset = 1;
    let q = BigUint::from_bytes_be(&pubkey[offset..offset + 20]);
    offset += 20;
    let p = BigUint::from_bytes_be(&pubkey[offset..offset + modlen]);
    offset += modlen;
    let g = BigUint::from_bytes_be(&pubkey[offset..offset + modlen]);
    offset += modlen;
    let y = BigUint::from_bytes_be(&pubkey[offset..offset + modlen]);

    let components = dsa::Components::from_components(p, q, g)
        .map_err(|err| DnsError::format(format!("invalid DSA domain parameters: {err}")))?;
    dsa::VerifyingKey::from_components(components, y)
        .map_err(|err| DnsError::format(format!("invalid DSA public key: {err}")))
}

/// RFC 2536's DSA signature wire format: a one-octet `T` (ignored; the
/// signature's own R/S are fixed 20 bytes regardless) followed by a
/// 20-byte R and a 20-byte S, rather than the DER encoding the `dsa` crate
/// expects on the wire.
fn verify_dsa(pubkey: &[u8], data: &[u8], signature: &[u8]) -> DnsResult<bool> {
    use dsa::signature::DigestVerifier;

    if signature.len() != 41 {
        return Err(DnsError::format(
            "DSA signature must be 41 bytes (1 + 20 + 20)",
        ));
    }
    let r = BigUint::from_bytes_be(&signature[1..21]);
    let s = BigUint::from_bytes_be(&signature[21..41]);
    let sig = dsa::Signature::from_components(r, s)
        .map_err(|err| DnsError::format(format!("invalid DSA signature components: {err}")))?;
    let key = parse_dsa_pubkey(pubkey)?;
    let mut hasher = Sha1::new();
    hasher.update(data);
    Ok(key.verify_digest(hasher, &sig).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_truncated_extended_exponent_length() {
        let pubkey = [0x00, 0x01];
        assert!(parse_rsa_pubkey(&pubkey).is_err());
    }

    #[test]
    fn rejects_exponent_longer_than_key() {
        let pubkey = [0xFF, 0x01, 0x02];
        assert!(parse_rsa_pubkey(&pubkey).is_err());
    }

    #[test]
    fn short_form_exponent_parses() {
        let mut pubkey = vec![3u8, 1, 0, 1];
        pubkey.extend_from_slice(&[0xAA; 256]);
        assert!(parse_rsa_pubkey(&pubkey).is_ok());
    }

    #[test]
    fn unsupported_algorithm_is_reported_not_silently_false() {
        let provider = DefaultCryptoProvider::new();
        assert!(!provider.supports(algo::ALGORITHM_ECDSAP256SHA256));
        assert!(provider
            .verify(algo::ALGORITHM_ECDSAP256SHA256, &[], b"data", &[])
            .is_err());
    }

    #[test]
    fn default_provider_advertises_rsa_and_dsa() {
        let provider = DefaultCryptoProvider::new();
        assert!(provider.supports(algo::ALGORITHM_RSASHA256));
        assert!(provider.supports(algo::ALGORITHM_DSA));
    }
}
