//! Positive validation: verifying an RRSIG over a candidate answer RRset
//! against a DNSKEY (RFC 4035 §5.3).

use crate::crypto::SignatureVerifier;
use crate::dns::labels::DomainName;
use crate::dns::rdata::sec::dnskey::DNSKEY;
use crate::dns::rdata::sec::rrsig::RRSig;
use crate::dns::rr::RRset;
use crate::error::{DnsError, DnsResult};
use crate::util::serial_in_validity_window;

/// RRSIGs from a response's answer+authority that could plausibly cover
/// `(name, type)`: `signer_name` is an ancestor-or-equal of `name`, the
/// type matches, and `now` falls in the signature's validity window under
/// RFC 1982 serial arithmetic.
pub fn covering_rrsigs<'a>(
    name: &DomainName,
    typ: u16,
    candidates: &'a [RRSig],
    now: u32,
) -> Vec<&'a RRSig> {
    candidates
        .iter()
        .filter(|sig| {
            sig.type_covered == typ
                && sig.signer_name.is_ancestor_or_equal_of(name)
                && serial_in_validity_window(sig.sig_inception, sig.sig_expiration, now)
        })
        .collect()
}

/// Selects the DNSKEYs eligible to have produced `rrsig`: zone-key flag
/// set, protocol 3 (already enforced by [`DNSKEY::decode`]), matching
/// algorithm, and matching key tag. Key tag is only a fast filter —
/// multiple keys can share a tag, so every candidate must still be tried.
pub fn candidate_keys<'a>(rrsig: &RRSig, dnskeys: &'a [DNSKEY]) -> Vec<&'a DNSKEY> {
    dnskeys
        .iter()
        .filter(|key| {
            key.is_zone_key()
                && key.algorithm == rrsig.algorithm
                && key.key_tag() == rrsig.key_tag
        })
        .collect()
}

/// Reconstructs the RFC 4034 §3.1.8.1 signing buffer and verifies `rrsig`
/// against `dnskey` over `rrset`. `rrset`'s owner name must equal
/// `rrsig`'s (the caller is responsible for having collected the right
/// RRset); wildcard normalisation is applied here when `rrsig.labels` is
/// fewer than the owner's label count.
pub fn verify_signature(
    rrset: &RRset,
    rrsig: &RRSig,
    dnskey: &DNSKEY,
    crypto: &dyn SignatureVerifier,
) -> DnsResult<bool> {
    let owner_labels = rrset.name().label_count() as u8;
    if rrsig.labels > owner_labels {
        return Err(DnsError::format(
            "RRSIG labels field exceeds owner name label count",
        ));
    }
    let signing_owner = if rrsig.labels < owner_labels {
        Some(rrset.name().wildcard_ancestor(rrsig.labels)?)
    } else {
        None
    };

    let mut buf = rrsig.signed_data_prefix();
    for rr in rrset.canonical_order() {
        // The signed form carries `origin_ttl`, not whatever TTL the
        // record currently holds (it may have been decremented while
        // cached) — substitute it before asking for the canonical bytes.
        let mut signed_rr = rr.clone();
        signed_rr.with_ttl(rrsig.origin_ttl);
        if let Some(owner) = &signing_owner {
            signed_rr.with_name(owner.clone());
        }
        signed_rr.encode_canonical(&mut buf, None);
    }

    crypto.verify(rrsig.algorithm, &dnskey.pub_key, &buf, &rrsig.signature)
}

/// Tries every candidate key for `rrsig`; any single success is sufficient.
pub fn verify_with_any_key(
    rrset: &RRset,
    rrsig: &RRSig,
    dnskeys: &[DNSKEY],
    crypto: &dyn SignatureVerifier,
) -> bool {
    candidate_keys(rrsig, dnskeys)
        .into_iter()
        .any(|key| matches!(verify_signature(rrset, rrsig, key, crypto), Ok(true)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::DefaultCryptoProvider;
    use crate::dns::rdata::a::A;
    use crate::dns::rdata::sec::key_tag::compute_key_tag;
    use crate::dns::rdata::RDataType;
    use crate::dns::rr::ResourceRecord;
    use rsa::{traits::PublicKeyParts, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
    use sha2::{Digest, Sha256};

    fn name(s: &str) -> DomainName {
        DomainName::from_text(s).unwrap()
    }

    fn build_rsa_dnskey() -> (DNSKEY, RsaPrivateKey) {
        let mut rng = rand::thread_rng();
        let priv_key = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let pub_key = RsaPublicKey::from(&priv_key);
        let e = pub_key.e().to_bytes_be();
        let n = pub_key.n().to_bytes_be();
        let mut pub_key_wire = Vec::new();
        pub_key_wire.push(e.len() as u8);
        pub_key_wire.extend_from_slice(&e);
        pub_key_wire.extend_from_slice(&n);
        let dnskey = DNSKEY {
            flags: 0x0100,
            protocol: 3,
            algorithm: 8, // RSASHA256
            pub_key: pub_key_wire,
        };
        (dnskey, priv_key)
    }

    #[test]
    fn verifies_a_freshly_signed_rrset() {
        let (dnskey, priv_key) = build_rsa_dnskey();
        let key_tag = compute_key_tag(&dnskey.rdata_wire());

        let mut rrset = RRset::new(name("example.com."), 1, 1);
        rrset
            .push(ResourceRecord::new(
                name("example.com."),
                1,
                1,
                3600,
                RDataType::A(A::new([192, 0, 2, 1].into())),
            ))
            .unwrap();

        let mut rrsig = RRSig {
            type_covered: 1,
            algorithm: 8,
            labels: 2,
            origin_ttl: 3600,
            sig_expiration: 2_000_000_000,
            sig_inception: 1_000_000_000,
            key_tag,
            signer_name: name("example.com."),
            signature: Vec::new(),
        };

        let mut buf = rrsig.signed_data_prefix();
        for rr in rrset.canonical_order() {
            let mut entry = Vec::new();
            rrset.name().canonical().encode_uncompressed(&mut entry, true);
            entry.extend_from_slice(&rrset.typ().to_be_bytes());
            entry.extend_from_slice(&rrset.class().to_be_bytes());
            entry.extend_from_slice(&rrsig.origin_ttl.to_be_bytes());
            let mut rdata = Vec::new();
            rr.rdata().encode_canonical(&mut rdata);
            entry.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
            entry.extend_from_slice(&rdata);
            buf.extend_from_slice(&entry);
        }
        let hashed = Sha256::digest(&buf);
        rrsig.signature = priv_key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &hashed)
            .unwrap();

        let crypto = DefaultCryptoProvider::new();
        assert!(verify_with_any_key(&rrset, &rrsig, &[dnskey], &crypto));
    }

    #[test]
    fn tampering_with_signature_breaks_verification() {
        let (dnskey, priv_key) = build_rsa_dnskey();
        let key_tag = compute_key_tag(&dnskey.rdata_wire());
        let mut rrset = RRset::new(name("example.com."), 1, 1);
        rrset
            .push(ResourceRecord::new(
                name("example.com."),
                1,
                1,
                3600,
                RDataType::A(A::new([192, 0, 2, 1].into())),
            ))
            .unwrap();
        let mut rrsig = RRSig {
            type_covered: 1,
            algorithm: 8,
            labels: 2,
            origin_ttl: 3600,
            sig_expiration: 2_000_000_000,
            sig_inception: 1_000_000_000,
            key_tag,
            signer_name: name("example.com."),
            signature: vec![0; 128],
        };
        let hashed = Sha256::digest(b"not the real buffer");
        rrsig.signature = priv_key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &hashed)
            .unwrap();
        let crypto = DefaultCryptoProvider::new();
        assert!(!verify_with_any_key(&rrset, &rrsig, &[dnskey], &crypto));
    }
}
