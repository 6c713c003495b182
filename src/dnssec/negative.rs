//! Negative (denial-of-existence) validation: NSEC (RFC 4035 §5.4) and
//! NSEC3 (RFC 5155 §8) proofs that a name or type does not exist.

use std::cmp::Ordering;

use crate::dns::labels::DomainName;
use crate::dns::rdata::sec::nsec::NSEC;
use crate::dns::rdata::sec::nsec3::NSEC3;
use crate::dns::rdata::sec::nsec3param::NSEC3PARAM;
use crate::dnssec::nsec3_hash::nsec3_hash;
use crate::error::{DnsError, DnsResult};

/// Canonical DNS name ordering (RFC 4034 §6.1): labels compared
/// least-significant (rightmost) first, case-insensitively; a name that is
/// a proper prefix of another in this rightmost-first walk sorts first.
fn canonical_cmp(a: &DomainName, b: &DomainName) -> Ordering {
    let a = a.canonical();
    let b = b.canonical();
    let (la, lb) = (a.labels(), b.labels());
    for (x, y) in la.iter().rev().zip(lb.iter().rev()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    la.len().cmp(&lb.len())
}

/// Does the NSEC interval `(owner, next)` cover `name`? Handles the
/// zone-wrap case where `next` is canonically less than or equal to
/// `owner` (the last NSEC in the zone, whose "next" is the apex again).
fn interval_covers(owner: &DomainName, next: &DomainName, name: &DomainName) -> bool {
    if canonical_cmp(owner, next) == Ordering::Less {
        canonical_cmp(owner, name) == Ordering::Less && canonical_cmp(name, next) == Ordering::Less
    } else {
        canonical_cmp(owner, name) == Ordering::Less || canonical_cmp(name, next) == Ordering::Less
    }
}

/// Number of trailing labels `a` and `b` share (canonical, case-insensitive).
fn common_suffix_len(a: &DomainName, b: &DomainName) -> usize {
    let a = a.canonical();
    let b = b.canonical();
    a.labels()
        .iter()
        .rev()
        .zip(b.labels().iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Trims `name` down to its trailing `keep` labels.
fn suffix(name: &DomainName, keep: usize) -> DnsResult<DomainName> {
    let labels = name.labels();
    if keep > labels.len() {
        return Err(DnsError::format("suffix length exceeds name"));
    }
    DomainName::from_labels(labels[labels.len() - keep..].to_vec())
}

fn wildcard_of(encloser: &DomainName) -> DnsResult<DomainName> {
    let mut labels = vec![b"*".to_vec()];
    labels.extend(encloser.labels().iter().cloned());
    DomainName::from_labels(labels)
}

/// One NSEC RR as seen in a response, paired with its owner name (the RR
/// itself does not carry its own owner).
pub struct NsecRecord<'a> {
    pub owner: DomainName,
    pub nsec: &'a NSEC,
}

/// Exact match: `qname` is this NSEC's owner, so the name exists. Looks
/// for the queried type (or CNAME, which redirects instead of answering
/// directly) in the bitmap (RFC 4035 §5.4 case 3/4: NODATA).
pub fn nsec_proves_no_data(qname: &DomainName, qtype: u16, records: &[NsecRecord]) -> bool {
    records.iter().any(|r| {
        canonical_cmp(&r.owner, qname) == Ordering::Equal
            && !r.nsec.has_type(qtype)
            && !r.nsec.has_type(crate::dns::rdata::TYPE_CNAME)
    })
}

/// Full NXDOMAIN proof (RFC 4035 §5.4 case 2): an NSEC covering `qname`
/// itself, plus an NSEC covering the wildcard at the closest encloser so
/// no wildcard could have synthesized an answer either.
pub fn nsec_proves_nxdomain(qname: &DomainName, records: &[NsecRecord]) -> DnsResult<bool> {
    let covering = records
        .iter()
        .find(|r| interval_covers(&r.owner, &r.nsec.next_domain_name, qname));
    let Some(covering) = covering else {
        return Ok(false);
    };

    let ce_len = common_suffix_len(qname, &covering.owner)
        .max(common_suffix_len(qname, &covering.nsec.next_domain_name));
    if ce_len == 0 || ce_len >= qname.label_count() {
        return Ok(false);
    }
    let encloser = suffix(qname, ce_len)?;
    let wildcard = wildcard_of(&encloser)?;

    let wildcard_absent = records
        .iter()
        .any(|r| interval_covers(&r.owner, &r.nsec.next_domain_name, &wildcard));
    Ok(wildcard_absent)
}

/// One NSEC3 RR as seen in a response: the raw hashed-owner bytes (decoded
/// from the owner name's leading base32hex label) paired with its RDATA.
pub struct Nsec3Record<'a> {
    pub owner_hash: Vec<u8>,
    pub nsec3: &'a NSEC3,
}

impl<'a> Nsec3Record<'a> {
    pub fn from_owner(owner: &DomainName, nsec3: &'a NSEC3) -> DnsResult<Self> {
        let first_label = owner
            .labels()
            .first()
            .ok_or_else(|| DnsError::format("NSEC3 owner name has no labels"))?;
        let text = std::str::from_utf8(first_label)
            .map_err(|_| DnsError::format("NSEC3 owner hash label is not ASCII"))?;
        let owner_hash = crate::util::base32hex_decode(text)
            .map_err(|_| DnsError::format("NSEC3 owner hash label is not valid base32hex"))?;
        Ok(Self { owner_hash, nsec3 })
    }
}

fn nsec3_interval_covers(owner_hash: &[u8], next_hash: &[u8], hash: &[u8]) -> bool {
    if next_hash > owner_hash {
        owner_hash < hash && hash < next_hash
    } else {
        owner_hash < hash || hash < next_hash
    }
}

fn hash_name(
    name: &DomainName,
    params: &NSEC3PARAM,
) -> DnsResult<Vec<u8>> {
    nsec3_hash(name, params.hash_algorithm, params.iterations, &params.salt)
}

/// Walks `qname`'s ancestors (immediate parent upward) looking for the
/// longest one whose hash exactly matches some provided NSEC3 owner — the
/// closest encloser (RFC 5155 §8.3).
fn closest_encloser<'a>(
    qname: &DomainName,
    params: &NSEC3PARAM,
    records: &'a [Nsec3Record<'a>],
) -> DnsResult<Option<(DomainName, &'a Nsec3Record<'a>)>> {
    let mut candidate = qname.clone();
    while let Some(parent) = candidate.parent() {
        let hash = hash_name(&parent, params)?;
        if let Some(rec) = records.iter().find(|r| r.owner_hash == hash) {
            return Ok(Some((parent, rec)));
        }
        candidate = parent;
    }
    Ok(None)
}

/// Full NSEC3 NXDOMAIN proof (RFC 5155 §8.4): closest encloser found, its
/// immediate child toward `qname` ("next closer name") proven absent, and
/// the wildcard at the closest encloser proven absent too.
pub fn nsec3_proves_nxdomain(
    qname: &DomainName,
    params: &NSEC3PARAM,
    records: &[Nsec3Record],
) -> DnsResult<bool> {
    let Some((encloser, _)) = closest_encloser(qname, params, records)? else {
        return Ok(false);
    };
    let ce_labels = encloser.label_count();
    if ce_labels >= qname.label_count() {
        return Ok(false);
    }
    let next_closer = suffix(qname, ce_labels + 1)?;
    let next_closer_hash = hash_name(&next_closer, params)?;
    let next_closer_absent = records
        .iter()
        .any(|r| nsec3_interval_covers(&r.owner_hash, &r.nsec3.next_hashed_owner, &next_closer_hash));
    if !next_closer_absent {
        return Ok(false);
    }

    let wildcard = wildcard_of(&encloser)?;
    let wildcard_hash = hash_name(&wildcard, params)?;
    let wildcard_absent = records
        .iter()
        .any(|r| nsec3_interval_covers(&r.owner_hash, &r.nsec3.next_hashed_owner, &wildcard_hash));
    Ok(wildcard_absent)
}

/// NSEC3 NODATA proof (RFC 5155 §8.5): an NSEC3 whose owner hash matches
/// `qname` exactly but whose bitmap lacks the queried type (and CNAME).
/// Returns `Ok(None)` when no exact match exists at all (caller should
/// fall back to the opt-out/no-match NODATA case for empty non-terminals).
pub fn nsec3_proves_no_data(
    qname: &DomainName,
    qtype: u16,
    params: &NSEC3PARAM,
    records: &[Nsec3Record],
) -> DnsResult<Option<bool>> {
    let hash = hash_name(qname, params)?;
    match records.iter().find(|r| r.owner_hash == hash) {
        Some(rec) => Ok(Some(
            !rec.nsec3.types.contains(&qtype)
                && !rec.nsec3.types.contains(&crate::dns::rdata::TYPE_CNAME),
        )),
        None => Ok(None),
    }
}

/// RFC 5155 §9.2 insecure-delegation carve-out: a closest-encloser proof
/// whose next-closer-name NSEC3 has the opt-out bit set means the name
/// might sit under an unsigned delegation the parent never signed — the
/// validator must treat this as `Insecure`, not `Bogus`, even though the
/// strict denial proof above fails to find coverage without opt-out.
pub fn nsec3_opt_out_permits_insecure(
    qname: &DomainName,
    params: &NSEC3PARAM,
    records: &[Nsec3Record],
) -> DnsResult<bool> {
    let Some((encloser, _)) = closest_encloser(qname, params, records)? else {
        return Ok(false);
    };
    let ce_labels = encloser.label_count();
    if ce_labels >= qname.label_count() {
        return Ok(false);
    }
    let next_closer = suffix(qname, ce_labels + 1)?;
    let next_closer_hash = hash_name(&next_closer, params)?;
    Ok(records.iter().any(|r| {
        r.nsec3.opt_out()
            && nsec3_interval_covers(&r.owner_hash, &r.nsec3.next_hashed_owner, &next_closer_hash)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DomainName {
        DomainName::from_text(s).unwrap()
    }

    fn nsec(next: &str, types: Vec<u16>) -> NSEC {
        NSEC {
            next_domain_name: name(next),
            types,
        }
    }

    #[test]
    fn canonical_ordering_is_rightmost_first() {
        assert_eq!(canonical_cmp(&name("a.com."), &name("b.com.")), Ordering::Less);
        assert_eq!(canonical_cmp(&name("z.example.com."), &name("a.com.")), Ordering::Greater);
    }

    #[test]
    fn interval_covers_plain_range() {
        assert!(interval_covers(&name("a.com."), &name("m.com."), &name("g.com.")));
        assert!(!interval_covers(&name("a.com."), &name("m.com."), &name("z.com.")));
    }

    #[test]
    fn interval_covers_zone_wrap() {
        // last NSEC in the zone: next points back to the apex.
        assert!(interval_covers(&name("zzz.example.com."), &name("example.com."), &name("zzzz.example.com.")));
    }

    #[test]
    fn nsec_nodata_requires_exact_owner_and_missing_type() {
        let n = nsec("b.example.com.", vec![1, 28]);
        let records = vec![NsecRecord {
            owner: name("a.example.com."),
            nsec: &n,
        }];
        assert!(nsec_proves_no_data(&name("a.example.com."), 15, &records));
        assert!(!nsec_proves_no_data(&name("a.example.com."), 1, &records));
    }

    #[test]
    fn nsec_nxdomain_needs_both_qname_and_wildcard_coverage() {
        // zone example.com, names a.example.com and z.example.com exist;
        // query for m.example.com (between them, no wildcard).
        let cover_qname = nsec("z.example.com.", vec![1]);
        let cover_wildcard = nsec("a.example.com.", vec![1]); // wraps: z -> a
        let records = vec![
            NsecRecord {
                owner: name("a.example.com."),
                nsec: &cover_qname,
            },
            NsecRecord {
                owner: name("z.example.com."),
                nsec: &cover_wildcard,
            },
        ];
        assert!(nsec_proves_nxdomain(&name("m.example.com."), &records).unwrap());
    }
}
