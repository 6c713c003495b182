//! DNAME RDATA (RFC 6672): non-terminal name redirection, substituting an
//! entire subtree rather than a single owner name the way CNAME does.

use super::RDataOperation;
use crate::dns::labels::DomainName;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DName(pub DomainName);

impl DName {
    pub fn new(target: DomainName) -> Self {
        Self(target)
    }

    pub fn target(&self) -> &DomainName {
        &self.0
    }
}

impl RDataOperation for DName {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        let mut offset = start;
        let name = DomainName::parse(message, &mut offset)?;
        if offset != end {
            return Err(DnsError::format("DNAME rdata length does not match name"));
        }
        Ok(DName(name))
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        // RFC 6672 §2.4: DNAME targets must not be compressed.
        self.0.encode_uncompressed(buf, false);
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        self.0.canonical().encode_uncompressed(buf, true);
    }
}
