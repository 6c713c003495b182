/*!
Ref: https://www.iana.org/assignments/dns-sec-alg-numbers/dns-sec-alg-numbers.xhtml

DNS Security Algorithm Numbers used by DNSKEY/RRSIG/DS/CDS/CDNSKEY.
Zone-signing algorithms only; SIG(0)/TSIG transaction-security
algorithms are out of scope here.
*/

pub type DNSSecAlgorithm = u8;

/// RSA/MD5 (deprecated, see RSASHA1). RFC 2537/4034.
pub const ALGORITHM_RSAMD5: DNSSecAlgorithm = 1;
/// Diffie-Hellman. RFC 2539. Not used for zone signing.
pub const ALGORITHM_DH: DNSSecAlgorithm = 2;
/// DSA/SHA-1. RFC 2536/3755.
pub const ALGORITHM_DSA: DNSSecAlgorithm = 3;
/// RSA/SHA-1. RFC 3110/4034.
pub const ALGORITHM_RSASHA1: DNSSecAlgorithm = 5;
/// DSA-NSEC3-SHA1. RFC 5155.
pub const ALGORITHM_DSA_NSEC3_SHA1: DNSSecAlgorithm = 6;
/// RSASHA1-NSEC3-SHA1. RFC 5155.
pub const ALGORITHM_RSASHA1_NSEC3_SHA1: DNSSecAlgorithm = 7;
/// RSA/SHA-256. RFC 5702.
pub const ALGORITHM_RSASHA256: DNSSecAlgorithm = 8;
/// RSA/SHA-512. RFC 5702.
pub const ALGORITHM_RSASHA512: DNSSecAlgorithm = 10;
/// ECDSA Curve P-256 with SHA-256. RFC 6605.
pub const ALGORITHM_ECDSAP256SHA256: DNSSecAlgorithm = 13;
/// ECDSA Curve P-384 with SHA-384. RFC 6605.
pub const ALGORITHM_ECDSAP384SHA384: DNSSecAlgorithm = 14;
/// Ed25519. RFC 8080.
pub const ALGORITHM_ED25519: DNSSecAlgorithm = 15;
/// Ed448. RFC 8080.
pub const ALGORITHM_ED448: DNSSecAlgorithm = 16;

pub fn algorithm_name(algorithm: DNSSecAlgorithm) -> &'static str {
    match algorithm {
        ALGORITHM_RSAMD5 => "RSAMD5",
        ALGORITHM_DH => "DH",
        ALGORITHM_DSA => "DSA",
        ALGORITHM_RSASHA1 => "RSASHA1",
        ALGORITHM_DSA_NSEC3_SHA1 => "DSA-NSEC3-SHA1",
        ALGORITHM_RSASHA1_NSEC3_SHA1 => "RSASHA1-NSEC3-SHA1",
        ALGORITHM_RSASHA256 => "RSASHA256",
        ALGORITHM_RSASHA512 => "RSASHA512",
        ALGORITHM_ECDSAP256SHA256 => "ECDSAP256SHA256",
        ALGORITHM_ECDSAP384SHA384 => "ECDSAP384SHA384",
        ALGORITHM_ED25519 => "ED25519",
        ALGORITHM_ED448 => "ED448",
        _ => "UNKNOWN",
    }
}

// ref: https://www.iana.org/assignments/ds-rr-types/ds-rr-types.xhtml
// Delegation Signer (DS) digest algorithms.
pub type DigestAlgorithm = u8;

/// SHA-1. RFC 3658. MANDATORY (but deprecated by most registries now).
pub const DIGEST_SHA1: DigestAlgorithm = 1;
/// SHA-256. RFC 4509. MANDATORY.
pub const DIGEST_SHA256: DigestAlgorithm = 2;
/// GOST R 34.11-94. RFC 5933.
pub const DIGEST_GOST_R_34_11_94: DigestAlgorithm = 3;
/// SHA-384. RFC 6605.
pub const DIGEST_SHA384: DigestAlgorithm = 4;
