//! DNSSEC validation: verifying RRSIGs over answer data (RFC 4035 §5.3),
//! walking the DS/DNSKEY chain of trust from a configured anchor down to
//! the zone being validated (RFC 4035 §5.2), and checking NSEC/NSEC3
//! denial-of-existence proofs (RFC 4035 §5.4, RFC 5155 §8) when a
//! response has no data to sign.
//!
//! This module supplies the mechanism; the orchestration — which records
//! to fetch next while walking the chain, how to react to a `Bogus`
//! verdict — belongs to whatever drives it (the iterative/stub resolver).

pub mod negative;
pub mod nsec3_hash;
pub mod positive;
#[cfg(test)]
pub mod sign;
pub mod trust_anchor;

use crate::crypto::{DigestProvider, SignatureVerifier};
use crate::dns::labels::DomainName;
use crate::dns::rdata::sec::dnskey::DNSKEY;
use crate::dns::rdata::sec::ds::DS;
use crate::dns::rdata::sec::rrsig::RRSig;
use crate::dns::rdata::{RDataType, TYPE_DNSKEY};
use crate::dns::rr::RRset;
use crate::error::{DnsError, DnsResult};
use trust_anchor::TrustAnchorStore;

/// The validation grade attached to a cached answer — the taxonomy RFC
/// 4035 §4.3 defines for a validator's output: a secure zone's RRSIG
/// verified (`Signed`), the zone is known
/// to have no DNSSEC at all (`Unsigned`), the chain of trust could not be
/// completed either way (`Indeterminate`), or something in a supposedly
/// secure chain failed to verify (`Bogus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Signed,
    Unsigned,
    Bogus,
    Indeterminate,
}

pub(crate) fn extract_dnskeys(rrset: &RRset) -> DnsResult<Vec<DNSKEY>> {
    rrset
        .records()
        .iter()
        .map(|rr| match rr.rdata() {
            RDataType::DNSKEY(key) => Ok(key.clone()),
            _ => Err(DnsError::format("non-DNSKEY record in DNSKEY RRset")),
        })
        .collect()
}

pub struct DnsSecValidator<C> {
    crypto: C,
    trust_anchors: TrustAnchorStore,
}

impl<C: SignatureVerifier + DigestProvider> DnsSecValidator<C> {
    pub fn new(crypto: C, trust_anchors: TrustAnchorStore) -> Self {
        Self {
            crypto,
            trust_anchors,
        }
    }

    pub fn trust_anchors(&self) -> &TrustAnchorStore {
        &self.trust_anchors
    }

    /// Validates a zone's DNSKEY RRset: at least one of its secure-entry-
    /// point keys must match either a configured trust anchor for `zone`
    /// or a DS record already validated in the parent zone, and that same
    /// key must verify the DNSKEY RRset's own RRSIG.
    pub fn validate_dnskey_rrset(
        &self,
        zone: &DomainName,
        dnskey_rrset: &RRset,
        rrsigs: &[RRSig],
        parent_ds: &[DS],
        now: u32,
    ) -> DnsResult<ValidationResult> {
        let dnskeys = extract_dnskeys(dnskey_rrset)?;
        let anchors = self.trust_anchors.for_zone(zone);

        if anchors.is_empty() && parent_ds.is_empty() {
            tracing::debug!(%zone, "no trust anchor and no parent DS: indeterminate");
            return Ok(ValidationResult::Indeterminate);
        }

        let mut trusted = Vec::new();
        for key in &dnskeys {
            if !key.is_secure_entry_point() {
                continue;
            }
            for anchor in anchors {
                if trust_anchor::dnskey_matches_trust_anchor(zone, key, anchor, &self.crypto)? {
                    trusted.push(key.clone());
                }
            }
            for ds in parent_ds {
                if trust_anchor::dnskey_matches_ds(zone, key, ds, &self.crypto)? {
                    trusted.push(key.clone());
                }
            }
        }
        if trusted.is_empty() {
            tracing::debug!(%zone, "no DNSKEY matched a trust anchor or parent DS: bogus");
            return Ok(ValidationResult::Bogus);
        }

        let covering = positive::covering_rrsigs(zone, TYPE_DNSKEY, rrsigs, now);
        if covering.is_empty() {
            tracing::debug!(%zone, "no RRSIG covers the DNSKEY RRset: bogus");
            return Ok(ValidationResult::Bogus);
        }
        let signed = covering
            .iter()
            .any(|sig| positive::verify_with_any_key(dnskey_rrset, sig, &trusted, &self.crypto));
        tracing::debug!(%zone, signed, "DNSKEY RRset verdict");
        Ok(if signed {
            ValidationResult::Signed
        } else {
            ValidationResult::Bogus
        })
    }

    /// Validates an ordinary RRset against an already-validated zone
    /// DNSKEY set. `zone_signed` distinguishes "this zone has no DNSSEC at
    /// all" (`Unsigned`) from "this zone is signed but this RRset's RRSIG
    /// doesn't check out" (`Bogus`).
    pub fn validate_rrset(
        &self,
        rrset: &RRset,
        rrsigs: &[RRSig],
        dnskeys: &[DNSKEY],
        zone_signed: bool,
        now: u32,
    ) -> ValidationResult {
        let covering = positive::covering_rrsigs(rrset.name(), rrset.typ(), rrsigs, now);
        if covering.is_empty() {
            let verdict = if zone_signed {
                ValidationResult::Bogus
            } else {
                ValidationResult::Unsigned
            };
            tracing::debug!(name = %rrset.name(), typ = rrset.typ(), ?verdict, "no covering RRSIG");
            return verdict;
        }
        let signed = covering
            .iter()
            .any(|sig| positive::verify_with_any_key(rrset, sig, dnskeys, &self.crypto));
        tracing::trace!(name = %rrset.name(), typ = rrset.typ(), signed, "RRset verdict");
        if signed {
            ValidationResult::Signed
        } else {
            ValidationResult::Bogus
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::DefaultCryptoProvider;

    fn name(s: &str) -> DomainName {
        DomainName::from_text(s).unwrap()
    }

    #[test]
    fn no_anchor_and_no_ds_is_indeterminate() {
        let validator = DnsSecValidator::new(DefaultCryptoProvider::new(), TrustAnchorStore::new());
        let rrset = RRset::new(name("example.com."), crate::dns::rdata::TYPE_DNSKEY, 1);
        let result = validator
            .validate_dnskey_rrset(&name("example.com."), &rrset, &[], &[], 0)
            .unwrap();
        assert_eq!(result, ValidationResult::Indeterminate);
    }

    #[test]
    fn unsigned_zone_with_no_covering_rrsig_is_unsigned_not_bogus() {
        let validator = DnsSecValidator::new(DefaultCryptoProvider::new(), TrustAnchorStore::new());
        let rrset = RRset::new(name("example.com."), 1, 1);
        let result = validator.validate_rrset(&rrset, &[], &[], false, 0);
        assert_eq!(result, ValidationResult::Unsigned);
    }

    #[test]
    fn signed_zone_with_no_covering_rrsig_is_bogus() {
        let validator = DnsSecValidator::new(DefaultCryptoProvider::new(), TrustAnchorStore::new());
        let rrset = RRset::new(name("example.com."), 1, 1);
        let result = validator.validate_rrset(&rrset, &[], &[], true, 0);
        assert_eq!(result, ValidationResult::Bogus);
    }
}
