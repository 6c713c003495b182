/*!
ref: https://www.rfc-editor.org/rfc/rfc2782

# SRV RDATA format

    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    |                   PRIORITY                    |
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    |                    WEIGHT                     |
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    |                     PORT                      |
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /                    TARGET                     /
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
*/

use super::RDataOperation;
use crate::dns::labels::DomainName;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SRV {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: DomainName,
}

impl RDataOperation for SRV {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if start + 6 > end {
            return Err(DnsError::format("truncated SRV rdata"));
        }
        let priority = u16::from_be_bytes([message[start], message[start + 1]]);
        let weight = u16::from_be_bytes([message[start + 2], message[start + 3]]);
        let port = u16::from_be_bytes([message[start + 4], message[start + 5]]);
        let mut offset = start + 6;
        let target = DomainName::parse(message, &mut offset)?;
        if offset != end {
            return Err(DnsError::format("SRV rdata length does not match target"));
        }
        Ok(SRV {
            priority,
            weight,
            port,
            target,
        })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        buf.extend_from_slice(&self.priority.to_be_bytes());
        buf.extend_from_slice(&self.weight.to_be_bytes());
        buf.extend_from_slice(&self.port.to_be_bytes());
        // RFC 2782: target is not compressed.
        self.target.encode_uncompressed(buf, false);
        let _ = compressor;
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.priority.to_be_bytes());
        buf.extend_from_slice(&self.weight.to_be_bytes());
        buf.extend_from_slice(&self.port.to_be_bytes());
        self.target.canonical().encode_uncompressed(buf, true);
    }
}
