/*!
The following RR definitions are expected to occur, at least
potentially, in all classes.  In particular, NS, SOA, CNAME, and PTR
will be used in all classes, and have the same format in all classes.
Because their RDATA format is known, all domain names in the RDATA
section of these RRs may be compressed.

<domain-name> is a domain name represented as a series of labels, and
terminated by a label with zero length.  <character-string> is a single
length octet followed by that number of characters.  <character-string>
is treated as binary information, and can be up to 256 characters in
length (including the length octet).
*/

pub mod a;
pub mod aaaa;
pub mod caa;
pub mod cname;
pub mod dname;
pub mod hinfo;
pub mod loc;
pub mod mx;
pub mod naptr;
pub mod ns;
pub mod openpgpkey;
pub mod opt;
pub mod ptr;
pub mod sec;
pub mod smimea;
pub mod soa;
pub mod srv;
pub mod sshfp;
pub mod svcb;
pub mod tlsa;
pub mod txt;
pub mod unknown;
pub mod uri;

use self::{
    a::A, aaaa::AAAA, caa::CAA, cname::CName, dname::DName, hinfo::HInfo, loc::LOC, mx::MX,
    naptr::NAPTR, ns::NS, openpgpkey::OpenPGPKey, opt::OPT, ptr::PTR, smimea::SMIMEA, soa::SOA,
    srv::SRV, sshfp::SSHFP, svcb::SVCB, tlsa::TLSA, txt::TXT, unknown::Unknown, uri::URI,
};
use self::sec::{
    cdnskey::CDNSKEY, cds::CDS, dnskey::DNSKEY, nsec::NSEC, nsec3::NSEC3, nsec3param::NSEC3PARAM,
    rrsig::RRSig, ds::DS,
};
use super::compress_list::NameCompressor;
use crate::error::DnsResult;
use std::fmt::Debug;

pub const TYPE_A: u16 = 1;
pub const TYPE_NS: u16 = 2;
pub const TYPE_CNAME: u16 = 5;
pub const TYPE_SOA: u16 = 6;
pub const TYPE_PTR: u16 = 12;
pub const TYPE_HINFO: u16 = 13;
pub const TYPE_MX: u16 = 15;
pub const TYPE_TXT: u16 = 16;
pub const TYPE_AAAA: u16 = 28;
pub const TYPE_LOC: u16 = 29;
pub const TYPE_SRV: u16 = 33;
pub const TYPE_NAPTR: u16 = 35;
pub const TYPE_DNAME: u16 = 39;
pub const TYPE_OPT: u16 = 41;
pub const TYPE_DS: u16 = 43;
pub const TYPE_SSHFP: u16 = 44;
pub const TYPE_RRSIG: u16 = 46;
pub const TYPE_NSEC: u16 = 47;
pub const TYPE_DNSKEY: u16 = 48;
pub const TYPE_NSEC3: u16 = 50;
pub const TYPE_NSEC3PARAM: u16 = 51;
pub const TYPE_TLSA: u16 = 52;
pub const TYPE_SMIMEA: u16 = 53;
pub const TYPE_CDS: u16 = 59;
pub const TYPE_CDNSKEY: u16 = 60;
pub const TYPE_OPENPGPKEY: u16 = 61;
pub const TYPE_SVCB: u16 = 64;
pub const TYPE_HTTPS: u16 = 65;
pub const TYPE_URI: u16 = 256;
pub const TYPE_CAA: u16 = 257;
pub const TYPE_AXFR: u16 = 252;
pub const TYPE_ANY: u16 = 255;

pub const CLASS_IN: u16 = 1;
pub const CLASS_CH: u16 = 3;
pub const CLASS_HS: u16 = 4;
pub const CLASS_NONE: u16 = 254;
pub const CLASS_ANY: u16 = 255;

/// Decodes and encodes a single RR's RDATA field. `decode` is given the
/// *whole message* plus the `[start, end)` byte range of this RDATA so
/// that RDATA containing domain names (NS, CNAME, MX, SOA, SRV, ...) can
/// follow compression pointers into earlier parts of the message.
pub trait RDataOperation: Debug {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self>
    where
        Self: Sized;

    /// Writes the wire form, using `compressor` for any domain names the
    /// type permits compressing.
    fn encode(&self, buf: &mut Vec<u8>, compressor: &mut NameCompressor) -> DnsResult<()>;

    /// Writes the DNSSEC canonical form (RFC 4034 §6.2): lowercase ASCII
    /// in any embedded domain name, never compressed.
    fn encode_canonical(&self, buf: &mut Vec<u8>);
}

/// Unions every RDATA shape this crate understands; unrecognized
/// (type, class) pairs decode into [`Unknown`], which keeps the raw bytes
/// rather than failing the whole message.
#[derive(Debug, Clone)]
pub enum RDataType {
    A(A),
    AAAA(AAAA),
    NS(NS),
    CName(CName),
    DName(DName),
    PTR(PTR),
    SOA(SOA),
    MX(MX),
    TXT(TXT),
    SRV(SRV),
    NAPTR(NAPTR),
    HInfo(HInfo),
    CAA(CAA),
    SSHFP(SSHFP),
    TLSA(TLSA),
    SMIMEA(SMIMEA),
    URI(URI),
    LOC(LOC),
    OpenPGPKey(OpenPGPKey),
    OPT(OPT),
    SVCB(SVCB),
    DNSKEY(DNSKEY),
    RRSig(RRSig),
    DS(DS),
    CDS(CDS),
    CDNSKEY(CDNSKEY),
    NSEC(NSEC),
    NSEC3(NSEC3),
    NSEC3PARAM(NSEC3PARAM),
    Unknown(Unknown),
}

macro_rules! dispatch {
    ($self:expr, $variant_fn:ident($($arg:expr),*)) => {
        match $self {
            RDataType::A(v) => v.$variant_fn($($arg),*),
            RDataType::AAAA(v) => v.$variant_fn($($arg),*),
            RDataType::NS(v) => v.$variant_fn($($arg),*),
            RDataType::CName(v) => v.$variant_fn($($arg),*),
            RDataType::DName(v) => v.$variant_fn($($arg),*),
            RDataType::PTR(v) => v.$variant_fn($($arg),*),
            RDataType::SOA(v) => v.$variant_fn($($arg),*),
            RDataType::MX(v) => v.$variant_fn($($arg),*),
            RDataType::TXT(v) => v.$variant_fn($($arg),*),
            RDataType::SRV(v) => v.$variant_fn($($arg),*),
            RDataType::NAPTR(v) => v.$variant_fn($($arg),*),
            RDataType::HInfo(v) => v.$variant_fn($($arg),*),
            RDataType::CAA(v) => v.$variant_fn($($arg),*),
            RDataType::SSHFP(v) => v.$variant_fn($($arg),*),
            RDataType::TLSA(v) => v.$variant_fn($($arg),*),
            RDataType::SMIMEA(v) => v.$variant_fn($($arg),*),
            RDataType::URI(v) => v.$variant_fn($($arg),*),
            RDataType::LOC(v) => v.$variant_fn($($arg),*),
            RDataType::OpenPGPKey(v) => v.$variant_fn($($arg),*),
            RDataType::OPT(v) => v.$variant_fn($($arg),*),
            RDataType::SVCB(v) => v.$variant_fn($($arg),*),
            RDataType::DNSKEY(v) => v.$variant_fn($($arg),*),
            RDataType::RRSig(v) => v.$variant_fn($($arg),*),
            RDataType::DS(v) => v.$variant_fn($($arg),*),
            RDataType::CDS(v) => v.$variant_fn($($arg),*),
            RDataType::CDNSKEY(v) => v.$variant_fn($($arg),*),
            RDataType::NSEC(v) => v.$variant_fn($($arg),*),
            RDataType::NSEC3(v) => v.$variant_fn($($arg),*),
            RDataType::NSEC3PARAM(v) => v.$variant_fn($($arg),*),
            RDataType::Unknown(v) => v.$variant_fn($($arg),*),
        }
    };
}

impl RDataType {
    pub fn decode(typ: u16, message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        Ok(match typ {
            TYPE_A => RDataType::A(A::decode(message, start, end)?),
            TYPE_AAAA => RDataType::AAAA(AAAA::decode(message, start, end)?),
            TYPE_NS => RDataType::NS(NS::decode(message, start, end)?),
            TYPE_CNAME => RDataType::CName(CName::decode(message, start, end)?),
            TYPE_DNAME => RDataType::DName(DName::decode(message, start, end)?),
            TYPE_PTR => RDataType::PTR(PTR::decode(message, start, end)?),
            TYPE_SOA => RDataType::SOA(SOA::decode(message, start, end)?),
            TYPE_MX => RDataType::MX(MX::decode(message, start, end)?),
            TYPE_TXT => RDataType::TXT(TXT::decode(message, start, end)?),
            TYPE_SRV => RDataType::SRV(SRV::decode(message, start, end)?),
            TYPE_NAPTR => RDataType::NAPTR(NAPTR::decode(message, start, end)?),
            TYPE_HINFO => RDataType::HInfo(HInfo::decode(message, start, end)?),
            TYPE_CAA => RDataType::CAA(CAA::decode(message, start, end)?),
            TYPE_SSHFP => RDataType::SSHFP(SSHFP::decode(message, start, end)?),
            TYPE_TLSA => RDataType::TLSA(TLSA::decode(message, start, end)?),
            TYPE_SMIMEA => RDataType::SMIMEA(SMIMEA::decode(message, start, end)?),
            TYPE_URI => RDataType::URI(URI::decode(message, start, end)?),
            TYPE_LOC => RDataType::LOC(LOC::decode(message, start, end)?),
            TYPE_OPENPGPKEY => RDataType::OpenPGPKey(OpenPGPKey::decode(message, start, end)?),
            TYPE_OPT => RDataType::OPT(OPT::decode(message, start, end)?),
            TYPE_SVCB | TYPE_HTTPS => RDataType::SVCB(SVCB::decode(message, start, end)?),
            TYPE_DNSKEY => RDataType::DNSKEY(DNSKEY::decode(message, start, end)?),
            TYPE_RRSIG => RDataType::RRSig(RRSig::decode(message, start, end)?),
            TYPE_DS => RDataType::DS(DS::decode(message, start, end)?),
            TYPE_CDS => RDataType::CDS(CDS::decode(message, start, end)?),
            TYPE_CDNSKEY => RDataType::CDNSKEY(CDNSKEY::decode(message, start, end)?),
            TYPE_NSEC => RDataType::NSEC(NSEC::decode(message, start, end)?),
            TYPE_NSEC3 => RDataType::NSEC3(NSEC3::decode(message, start, end)?),
            TYPE_NSEC3PARAM => RDataType::NSEC3PARAM(NSEC3PARAM::decode(message, start, end)?),
            _ => RDataType::Unknown(Unknown::decode(message, start, end)?),
        })
    }

    pub fn encode(&self, buf: &mut Vec<u8>, compressor: &mut NameCompressor) -> DnsResult<()> {
        dispatch!(self, encode(buf, compressor))
    }

    pub fn encode_canonical(&self, buf: &mut Vec<u8>) {
        dispatch!(self, encode_canonical(buf))
    }
}

/// Parses a `character-string`: a one-octet length prefix followed by
/// that many bytes (RFC 1035 §3.3). Used by TXT, HINFO, NAPTR, CAA.
pub(crate) fn decode_character_string(data: &[u8], offset: &mut usize) -> DnsResult<Vec<u8>> {
    if *offset >= data.len() {
        return Err(crate::error::DnsError::format("truncated character-string"));
    }
    let len = data[*offset] as usize;
    *offset += 1;
    if *offset + len > data.len() {
        return Err(crate::error::DnsError::format("truncated character-string"));
    }
    let s = data[*offset..*offset + len].to_vec();
    *offset += len;
    Ok(s)
}

pub(crate) fn encode_character_string(buf: &mut Vec<u8>, s: &[u8]) -> DnsResult<()> {
    if s.len() > 255 {
        return Err(crate::error::DnsError::format(
            "character-string longer than 255 bytes",
        ));
    }
    buf.push(s.len() as u8);
    buf.extend_from_slice(s);
    Ok(())
}
