//! Fallback RDATA for any (type, class) this crate doesn't parse natively:
//! the raw bytes are kept so the record still round-trips through
//! encode/decode and through the cache, even though its fields aren't
//! exposed.

use super::RDataOperation;
use crate::error::DnsResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unknown(pub Vec<u8>);

impl Unknown {
    pub fn raw(&self) -> &[u8] {
        &self.0
    }
}

impl RDataOperation for Unknown {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        Ok(Unknown(message[start..end].to_vec()))
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        buf.extend_from_slice(&self.0);
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.0);
    }
}
