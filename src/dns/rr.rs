use super::compress_list::NameCompressor;
use super::labels::DomainName;
use super::rdata::RDataType;
use crate::error::{DnsError, DnsResult};

/// The answer, authority, and additional sections all share the same
/// format: a variable number of resource records, where the number of
/// records is specified in the corresponding count field in the header.
/// Each resource record has the following format:
/// ```shell
///       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     /                      NAME                     /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      TYPE                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                     CLASS                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      TTL                      |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                   RDLENGTH                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--|
///     /                     RDATA                     /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone)]
pub struct ResourceRecord {
    name: DomainName,
    typ: u16,
    class: u16,
    ttl: u32,
    /// Unrecognized (typ, class) combinations decode as `RDataType::Unknown`,
    /// which retains the raw bytes rather than failing the whole message.
    rdata: RDataType,
}

impl ResourceRecord {
    pub fn new(name: DomainName, typ: u16, class: u16, ttl: u32, rdata: RDataType) -> Self {
        Self {
            name,
            typ,
            class,
            ttl,
            rdata,
        }
    }

    pub fn name(&self) -> &DomainName {
        &self.name
    }

    pub fn with_name(&mut self, name: DomainName) -> &mut Self {
        self.name = name;
        self
    }

    pub fn typ(&self) -> u16 {
        self.typ
    }

    pub fn class(&self) -> u16 {
        self.class
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn with_ttl(&mut self, ttl: u32) -> &mut Self {
        self.ttl = ttl;
        self
    }

    pub fn rdata(&self) -> &RDataType {
        &self.rdata
    }

    pub fn rdata_mut(&mut self) -> &mut RDataType {
        &mut self.rdata
    }

    pub fn parse(message: &[u8], offset: &mut usize) -> DnsResult<Self> {
        let name = DomainName::parse(message, offset)?;
        if *offset + 10 > message.len() {
            return Err(DnsError::format("truncated resource record header"));
        }
        let typ = u16::from_be_bytes([message[*offset], message[*offset + 1]]);
        let class = u16::from_be_bytes([message[*offset + 2], message[*offset + 3]]);
        let ttl = u32::from_be_bytes(message[*offset + 4..*offset + 8].try_into().unwrap());
        let rdlength = u16::from_be_bytes([message[*offset + 8], message[*offset + 9]]) as usize;
        *offset += 10;

        if *offset + rdlength > message.len() {
            return Err(DnsError::format("rdata length exceeds message bounds"));
        }
        let rdata_start = *offset;
        let rdata_end = *offset + rdlength;
        let rdata = RDataType::decode(typ, message, rdata_start, rdata_end)?;
        *offset = rdata_end;

        Ok(Self {
            name,
            typ,
            class,
            ttl,
            rdata,
        })
    }

    pub fn encode(&self, buf: &mut Vec<u8>, compressor: &mut NameCompressor) -> DnsResult<()> {
        compressor.encode(&self.name, buf);
        buf.extend_from_slice(&self.typ.to_be_bytes());
        buf.extend_from_slice(&self.class.to_be_bytes());
        buf.extend_from_slice(&self.ttl.to_be_bytes());

        let rdlength_at = buf.len();
        buf.extend_from_slice(&[0, 0]);
        let rdata_start = buf.len();
        self.rdata.encode(buf, compressor)?;
        let rdlength = buf.len() - rdata_start;
        if rdlength > u16::MAX as usize {
            return Err(DnsError::format("rdata too large to encode"));
        }
        buf[rdlength_at..rdlength_at + 2].copy_from_slice(&(rdlength as u16).to_be_bytes());
        Ok(())
    }

    /// Encodes into the canonical form DNSSEC signing requires (spec
    /// §4.3.1/§4.5): owner name lowercased and uncompressed, RDATA domain
    /// names (where the type's rules require it) lowercased, no name
    /// compression anywhere.
    pub fn encode_canonical(&self, buf: &mut Vec<u8>, owner_override: Option<&DomainName>) {
        let owner = owner_override.unwrap_or(&self.name).canonical();
        owner.encode_uncompressed(buf, true);
        buf.extend_from_slice(&self.typ.to_be_bytes());
        buf.extend_from_slice(&self.class.to_be_bytes());
        buf.extend_from_slice(&self.ttl.to_be_bytes());

        let rdlength_at = buf.len();
        buf.extend_from_slice(&[0, 0]);
        let rdata_start = buf.len();
        self.rdata.encode_canonical(buf);
        let rdlength = (buf.len() - rdata_start) as u16;
        buf[rdlength_at..rdlength_at + 2].copy_from_slice(&rdlength.to_be_bytes());
    }
}

/// An RRset: all records sharing (owner name, type, class). Canonical
/// ordering (RFC 4034 §6.3) is applied lazily by
/// [`RRset::canonical_order`] rather than maintained on every push, since
/// most RRsets are built once and ordered at most once before signing.
#[derive(Debug, Clone)]
pub struct RRset {
    name: DomainName,
    typ: u16,
    class: u16,
    records: Vec<ResourceRecord>,
}

impl RRset {
    pub fn new(name: DomainName, typ: u16, class: u16) -> Self {
        Self {
            name,
            typ,
            class,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, rr: ResourceRecord) -> DnsResult<()> {
        if rr.typ() != self.typ || rr.class() != self.class || rr.name() != &self.name {
            return Err(DnsError::format(
                "resource record does not match this RRset's owner/type/class",
            ));
        }
        self.records.push(rr);
        Ok(())
    }

    pub fn name(&self) -> &DomainName {
        &self.name
    }

    pub fn typ(&self) -> u16 {
        self.typ
    }

    pub fn class(&self) -> u16 {
        self.class
    }

    pub fn records(&self) -> &[ResourceRecord] {
        &self.records
    }

    /// The RRset's TTL per RFC 2181 §5.2: the minimum of the member TTLs
    /// (what a compliant resolver should use/cache, regardless of what
    /// individual records on the wire claimed).
    pub fn ttl(&self) -> Option<u32> {
        self.records.iter().map(ResourceRecord::ttl).min()
    }

    /// Sorts a copy of the member records into RRset canonical order
    /// (RFC 4034 §6.3): by ascending canonical-form RDATA, used both by
    /// the signer and by the validator when reconstructing the signed
    /// buffer.
    pub fn canonical_order(&self) -> Vec<&ResourceRecord> {
        let mut buffers: Vec<(Vec<u8>, &ResourceRecord)> = self
            .records
            .iter()
            .map(|rr| {
                let mut buf = Vec::new();
                rr.rdata().encode_canonical(&mut buf);
                (buf, rr)
            })
            .collect();
        buffers.sort_by(|a, b| a.0.cmp(&b.0));
        buffers.into_iter().map(|(_, rr)| rr).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::rdata::a::A;

    fn a_rr(name: &str, addr: [u8; 4], ttl: u32) -> ResourceRecord {
        ResourceRecord::new(
            DomainName::from_text(name).unwrap(),
            1,
            1,
            ttl,
            RDataType::A(A::new(addr.into())),
        )
    }

    #[test]
    fn encode_parse_round_trip() {
        let rr = a_rr("example.com.", [192, 0, 2, 1], 300);
        let mut buf = Vec::new();
        let mut compressor = NameCompressor::new();
        rr.encode(&mut buf, &mut compressor).unwrap();

        let mut offset = 0;
        let parsed = ResourceRecord::parse(&buf, &mut offset).unwrap();
        assert_eq!(offset, buf.len());
        assert_eq!(parsed.name(), rr.name());
        assert_eq!(parsed.ttl(), 300);
    }

    #[test]
    fn rrset_rejects_mismatched_member() {
        let mut set = RRset::new(DomainName::from_text("example.com.").unwrap(), 1, 1);
        set.push(a_rr("example.com.", [192, 0, 2, 1], 300)).unwrap();
        let mismatched = a_rr("other.example.com.", [192, 0, 2, 2], 300);
        assert!(set.push(mismatched).is_err());
    }

    #[test]
    fn rrset_ttl_is_the_minimum_member_ttl() {
        let mut set = RRset::new(DomainName::from_text("example.com.").unwrap(), 1, 1);
        set.push(a_rr("example.com.", [192, 0, 2, 1], 300)).unwrap();
        set.push(a_rr("example.com.", [192, 0, 2, 2], 100)).unwrap();
        assert_eq!(set.ttl(), Some(100));
    }
}
