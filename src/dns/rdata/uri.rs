//! URI RDATA (RFC 7553). Unlike SRV's TARGET, the target here is a plain
//! UTF-8 string (a URI), not a domain name.

use super::RDataOperation;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct URI {
    pub priority: u16,
    pub weight: u16,
    pub target: String,
}

impl RDataOperation for URI {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if start + 4 > end {
            return Err(DnsError::format("truncated URI rdata"));
        }
        let priority = u16::from_be_bytes([message[start], message[start + 1]]);
        let weight = u16::from_be_bytes([message[start + 2], message[start + 3]]);
        let target = String::from_utf8(message[start + 4..end].to_vec())
            .map_err(|_| DnsError::format("URI target is not valid UTF-8"))?;
        Ok(URI {
            priority,
            weight,
            target,
        })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        buf.extend_from_slice(&self.priority.to_be_bytes());
        buf.extend_from_slice(&self.weight.to_be_bytes());
        buf.extend_from_slice(self.target.as_bytes());
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.priority.to_be_bytes());
        buf.extend_from_slice(&self.weight.to_be_bytes());
        buf.extend_from_slice(self.target.as_bytes());
    }
}
