//! SSHFP RDATA (RFC 4255): an SSH public key fingerprint.

use super::RDataOperation;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SSHFP {
    pub algorithm: u8,
    pub fp_type: u8,
    pub fingerprint: Vec<u8>,
}

impl RDataOperation for SSHFP {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if start + 2 > end {
            return Err(DnsError::format("truncated SSHFP rdata"));
        }
        Ok(SSHFP {
            algorithm: message[start],
            fp_type: message[start + 1],
            fingerprint: message[start + 2..end].to_vec(),
        })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        buf.push(self.algorithm);
        buf.push(self.fp_type);
        buf.extend_from_slice(&self.fingerprint);
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.push(self.algorithm);
        buf.push(self.fp_type);
        buf.extend_from_slice(&self.fingerprint);
    }
}
