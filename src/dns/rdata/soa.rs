/*!
ref: https://www.rfc-editor.org/rfc/rfc1035#section-3.3.13

# SOA RDATA format

    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /                     MNAME                     /
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /                     RNAME                     /
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    |                    SERIAL                     |
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    |                    REFRESH                    |
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    |                     RETRY                     |
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    |                    EXPIRE                     |
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    |                    MINIMUM                    |
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+

MINIMUM is used as the floor for negative-caching TTLs (RFC 2308 §5)
in addition to its RFC 1035 role as the zone's default RR TTL.
*/

use super::RDataOperation;
use crate::dns::labels::DomainName;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SOA {
    pub mname: DomainName,
    pub rname: DomainName,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

impl RDataOperation for SOA {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        let mut offset = start;
        let mname = DomainName::parse(message, &mut offset)?;
        let rname = DomainName::parse(message, &mut offset)?;
        if offset + 20 != end {
            return Err(DnsError::format("truncated SOA rdata"));
        }
        let read_u32 = |off: usize| u32::from_be_bytes(message[off..off + 4].try_into().unwrap());
        let soa = SOA {
            mname,
            rname,
            serial: read_u32(offset),
            refresh: read_u32(offset + 4),
            retry: read_u32(offset + 8),
            expire: read_u32(offset + 12),
            minimum: read_u32(offset + 16),
        };
        Ok(soa)
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        compressor.encode(&self.mname, buf);
        compressor.encode(&self.rname, buf);
        buf.extend_from_slice(&self.serial.to_be_bytes());
        buf.extend_from_slice(&self.refresh.to_be_bytes());
        buf.extend_from_slice(&self.retry.to_be_bytes());
        buf.extend_from_slice(&self.expire.to_be_bytes());
        buf.extend_from_slice(&self.minimum.to_be_bytes());
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        self.mname.canonical().encode_uncompressed(buf, true);
        self.rname.canonical().encode_uncompressed(buf, true);
        buf.extend_from_slice(&self.serial.to_be_bytes());
        buf.extend_from_slice(&self.refresh.to_be_bytes());
        buf.extend_from_slice(&self.retry.to_be_bytes());
        buf.extend_from_slice(&self.expire.to_be_bytes());
        buf.extend_from_slice(&self.minimum.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_encode_round_trip() {
        let mut raw = vec![0x00]; // root mname
        raw.extend([0x00]); // root rname
        raw.extend(1u32.to_be_bytes());
        raw.extend(2u32.to_be_bytes());
        raw.extend(3u32.to_be_bytes());
        raw.extend(4u32.to_be_bytes());
        raw.extend(5u32.to_be_bytes());
        let soa = SOA::decode(&raw, 0, raw.len()).unwrap();
        assert_eq!(soa.serial, 1);
        assert_eq!(soa.minimum, 5);
    }
}
