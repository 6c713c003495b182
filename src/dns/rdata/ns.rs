/*!
ref: https://www.rfc-editor.org/rfc/rfc1035#section-3.3.11

# NS RDATA format

    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /                   NSDNAME                     /
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+

NSDNAME is a <domain-name> which specifies a host which should be
authoritative for the specified class and domain.
*/

use super::RDataOperation;
use crate::dns::labels::DomainName;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NS(pub DomainName);

impl NS {
    pub fn new(name: DomainName) -> Self {
        Self(name)
    }

    pub fn nsdname(&self) -> &DomainName {
        &self.0
    }
}

impl RDataOperation for NS {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        let mut offset = start;
        let name = DomainName::parse(message, &mut offset)?;
        if offset != end {
            return Err(DnsError::format("NS rdata length does not match name"));
        }
        Ok(NS(name))
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
    fn decode_rejects_trailing_bytes() {
        let mut raw = vec![0x03, b'c', b'o', b'm', 0x00];
        raw.push(0xAA);
        assert!(NS::decode(&raw, 0, raw.len()).is_err());
    }

    #[test]
    fn decode_encode_round_trip() {
        let raw = [0x03, b'c', b'o', b'm', 0x00];
        let ns = NS::decode(&raw, 0, raw.len()).unwrap();
        assert_eq!(ns.nsdname().to_text(), "com.");
    }
}
