/*!
ref: https://www.rfc-editor.org/rfc/rfc1035#section-3.3.12

# PTR RDATA format

    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /                   PTRDNAME                    /
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+

PTRDNAME is a <domain-name> which points to some location in the
domain name space, e.g. the reverse-mapping IN-ADDR.ARPA tree.
*/

use super::RDataOperation;
use crate::dns::labels::DomainName;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PTR(pub DomainName);

impl PTR {
    pub fn new(name: DomainName) -> Self {
        Self(name)
    }

    pub fn ptrdname(&self) -> &DomainName {
        &self.0
    }
}

impl RDataOperation for PTR {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        let mut offset = start;
        let name = DomainName::parse(message, &mut offset)?;
        if offset != end {
            return Err(DnsError::format("PTR rdata length does not match name"));
        }
        Ok(PTR(name))
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
