//! Chain-of-trust anchoring: configured trust anchors and the DS-to-DNSKEY
//! match that extends trust one zone cut deeper (RFC 4035 §5.2).

use std::collections::HashMap;

use crate::crypto::DigestProvider;
use crate::dns::labels::DomainName;
use crate::dns::rdata::sec::algo::{DNSSecAlgorithm, DigestAlgorithm};
use crate::dns::rdata::sec::dnskey::DNSKEY;
use crate::dns::rdata::sec::ds::DS;
use crate::dns::rdata::sec::key_tag::KeyTag;
use crate::error::DnsResult;

/// A pinned (zone, key_tag, algorithm, digest) tuple — the externally
/// configured starting point for a chain of trust, shaped identically to
/// a DS record since that's what it is logically anchoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    pub key_tag: KeyTag,
    pub algorithm: DNSSecAlgorithm,
    pub digest_type: DigestAlgorithm,
    pub digest: Vec<u8>,
}

impl From<&DS> for TrustAnchor {
    fn from(ds: &DS) -> Self {
        TrustAnchor {
            key_tag: ds.key_tag,
            algorithm: ds.algorithm,
            digest_type: ds.digest_type,
            digest: ds.digest.clone(),
        }
    }
}

/// `zone -> [trust anchors]`. Typically just the root, but nothing here
/// assumes that — an operator can pin a deeper zone directly (a private
/// DNSSEC island).
#[derive(Debug, Default, Clone)]
pub struct TrustAnchorStore {
    anchors: HashMap<DomainName, Vec<TrustAnchor>>,
}

impl TrustAnchorStore {
    pub fn new() -> Self {
        Self {
            anchors: HashMap::new(),
        }
    }

    pub fn insert(&mut self, zone: DomainName, anchor: TrustAnchor) {
        self.anchors.entry(zone).or_default().push(anchor);
    }

    pub fn for_zone(&self, zone: &DomainName) -> &[TrustAnchor] {
        self.anchors.get(zone).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_anchor_for(&self, zone: &DomainName) -> bool {
        !self.for_zone(zone).is_empty()
    }
}

/// The RFC 4034 §5.1.4 DS digest input: the owner's canonical name
/// concatenated with the DNSKEY RDATA.
fn ds_digest_input(owner: &DomainName, dnskey: &DNSKEY) -> Vec<u8> {
    let mut buf = Vec::new();
    owner.canonical().encode_uncompressed(&mut buf, true);
    buf.extend_from_slice(&dnskey.rdata_wire());
    buf
}

/// Does `dnskey` (published at `owner`) match `ds`? (RFC 4035 §5.2).
pub fn dnskey_matches_ds(
    owner: &DomainName,
    dnskey: &DNSKEY,
    ds: &DS,
    digests: &dyn DigestProvider,
) -> DnsResult<bool> {
    if dnskey.algorithm != ds.algorithm || dnskey.key_tag() != ds.key_tag {
        return Ok(false);
    }
    let digest = digests.digest(ds.digest_type, &ds_digest_input(owner, dnskey))?;
    Ok(digest == ds.digest)
}

/// Does `dnskey` match a configured trust anchor for its own zone?
pub fn dnskey_matches_trust_anchor(
    owner: &DomainName,
    dnskey: &DNSKEY,
    anchor: &TrustAnchor,
    digests: &dyn DigestProvider,
) -> DnsResult<bool> {
    if dnskey.algorithm != anchor.algorithm || dnskey.key_tag() != anchor.key_tag {
        return Ok(false);
    }
    let digest = digests.digest(anchor.digest_type, &ds_digest_input(owner, dnskey))?;
    Ok(digest == anchor.digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::DefaultCryptoProvider;

    fn name(s: &str) -> DomainName {
        DomainName::from_text(s).unwrap()
    }

    #[test]
    fn store_returns_empty_slice_for_unknown_zone() {
        let store = TrustAnchorStore::new();
        assert!(store.for_zone(&name("example.com.")).is_empty());
        assert!(!store.has_anchor_for(&name("example.com.")));
    }

    #[test]
    fn ds_digest_matches_generated_ds() {
        let owner = name(".");
        let dnskey = DNSKEY {
            flags: 0x0101,
            protocol: 3,
            algorithm: 8,
            pub_key: vec![3, 1, 0, 1, 0xAA, 0xBB],
        };
        let crypto = DefaultCryptoProvider::new();
        let digest = crypto
            .digest(crate::dns::rdata::sec::algo::DIGEST_SHA256, &ds_digest_input(&owner, &dnskey))
            .unwrap();
        let ds = DS {
            key_tag: dnskey.key_tag(),
            algorithm: dnskey.algorithm,
            digest_type: crate::dns::rdata::sec::algo::DIGEST_SHA256,
            digest,
        };
        assert!(dnskey_matches_ds(&owner, &dnskey, &ds, &crypto).unwrap());
    }
}
