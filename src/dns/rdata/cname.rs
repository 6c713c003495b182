//! CNAME RDATA (RFC 1035 §3.3.1): the canonical name for an alias.

use super::RDataOperation;
use crate::dns::labels::DomainName;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CName(pub DomainName);

impl CName {
    pub fn new(name: DomainName) -> Self {
        Self(name)
    }

    pub fn cname(&self) -> &DomainName {
        &self.0
    }
}

impl RDataOperation for CName {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        let mut offset = start;
        let name = DomainName::parse(message, &mut offset)?;
        if offset != end {
            return Err(DnsError::format("CNAME rdata length does not match name"));
        }
        Ok(CName(name))
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        compressor.encode(&self.0, buf);
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        self.0.canonical().encode_uncompressed(buf, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_encode_round_trip() {
        let raw = [0x03, b'w', b'w', b'w', 0x00];
        let cname = CName::decode(&raw, 0, raw.len()).unwrap();
        assert_eq!(cname.cname().to_text(), "www.");
    }
}
