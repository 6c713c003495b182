//! OPENPGPKEY RDATA (RFC 7929): a raw OpenPGP public key (DANE-style).

use super::RDataOperation;
use crate::error::DnsResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenPGPKey(pub Vec<u8>);

impl RDataOperation for OpenPGPKey {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        Ok(OpenPGPKey(message[start..end].to_vec()))
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
