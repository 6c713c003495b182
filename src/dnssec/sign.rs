//! Test-only canonical signer: produces a valid RRSIG over an RRset given
//! an RSA private key, so other modules' tests can build realistic signed
//! fixtures without hand-assembling signature bytes. Never compiled into
//! a non-test build — nothing downstream of this crate's own tests should
//! be minting signatures at runtime.

use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha2::{Digest, Sha256};

use crate::dns::labels::DomainName;
use crate::dns::rdata::sec::algo::ALGORITHM_RSASHA256;
use crate::dns::rdata::sec::key_tag::KeyTag;
use crate::dns::rdata::sec::rrsig::RRSig;
use crate::dns::rr::RRset;

/// Signs `rrset` with `key` under RSA/SHA-256, returning a ready-to-use
/// RRSIG. `labels` should be the owner name's label count (or fewer, to
/// exercise wildcard expansion in a test).
#[allow(clippy::too_many_arguments)]
pub fn sign_rrset(
    rrset: &RRset,
    key: &RsaPrivateKey,
    key_tag: KeyTag,
    signer_name: DomainName,
    labels: u8,
    origin_ttl: u32,
    inception: u32,
    expiration: u32,
) -> RRSig {
    let mut rrsig = RRSig {
        type_covered: rrset.typ(),
        algorithm: ALGORITHM_RSASHA256,
        labels,
        origin_ttl,
        sig_expiration: expiration,
        sig_inception: inception,
        key_tag,
        signer_name,
        signature: Vec::new(),
    };

    let mut buf = rrsig.signed_data_prefix();
    for rr in rrset.canonical_order() {
        let mut signed_rr = rr.clone();
        signed_rr.with_ttl(origin_ttl);
        signed_rr.encode_canonical(&mut buf, None);
    }
    let hashed = Sha256::digest(&buf);
    rrsig.signature = key
        .sign(Pkcs1v15Sign::new::<Sha256>(), &hashed)
        .expect("signing a well-formed buffer with a valid key cannot fail");
    rrsig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::rdata::a::A;
    use crate::dns::rdata::RDataType;
    use crate::dns::rdata::sec::dnskey::DNSKEY;
    use crate::dns::rdata::sec::key_tag::compute_key_tag;
    use crate::dns::rr::ResourceRecord;
    use crate::dnssec::positive::verify_with_any_key;
    use crate::crypto::DefaultCryptoProvider;
    use rsa::{traits::PublicKeyParts, RsaPublicKey};

    #[test]
    fn signed_fixture_verifies() {
        let mut rng = rand::thread_rng();
        let priv_key = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let pub_key = RsaPublicKey::from(&priv_key);
        let e = pub_key.e().to_bytes_be();
        let n = pub_key.n().to_bytes_be();
        let mut wire = vec![e.len() as u8];
        wire.extend_from_slice(&e);
        wire.extend_from_slice(&n);
        let dnskey = DNSKEY {
            flags: 0x0100,
            protocol: 3,
            algorithm: ALGORITHM_RSASHA256,
            pub_key: wire,
        };
        let key_tag = compute_key_tag(&dnskey.rdata_wire());

        let owner = DomainName::from_text("www.example.com.").unwrap();
        let mut rrset = RRset::new(owner.clone(), 1, 1);
        rrset
            .push(ResourceRecord::new(
                owner.clone(),
                1,
                1,
                3600,
                RDataType::A(A::new([192, 0, 2, 1].into())),
            ))
            .unwrap();

        let rrsig = sign_rrset(
            &rrset,
            &priv_key,
            key_tag,
            DomainName::from_text("example.com.").unwrap(),
            3,
            3600,
            1_000_000_000,
            2_000_000_000,
        );

        let crypto = DefaultCryptoProvider::new();
        assert!(verify_with_any_key(&rrset, &rrsig, &[dnskey], &crypto));
    }
}
