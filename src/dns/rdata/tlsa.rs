//! TLSA RDATA (RFC 6698): DANE TLS certificate association.

use super::RDataOperation;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TLSA {
    pub cert_usage: u8,
    pub selector: u8,
    pub matching_type: u8,
    pub cert_data: Vec<u8>,
}

impl RDataOperation for TLSA {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if start + 3 > end {
            return Err(DnsError::format("truncated TLSA rdata"));
        }
        Ok(TLSA {
            cert_usage: message[start],
            selector: message[start + 1],
            matching_type: message[start + 2],
            cert_data: message[start + 3..end].to_vec(),
        })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        buf.push(self.cert_usage);
        buf.push(self.selector);
        buf.push(self.matching_type);
        buf.extend_from_slice(&self.cert_data);
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.push(self.cert_usage);
        buf.push(self.selector);
        buf.push(self.matching_type);
        buf.extend_from_slice(&self.cert_data);
    }
}
