//! CDS RDATA (RFC 7344): a child's proposed DS record, published at the
//! zone apex for the parent to pick up during a DS-update handshake.
//! Identical wire shape to DS; `key_tag=0, algorithm=0, digest_type=0,
//! digest=empty` is the RFC 8078 "delete DS" signal.

use super::algo::{DNSSecAlgorithm, DigestAlgorithm};
use super::key_tag::KeyTag;
use crate::dns::rdata::RDataOperation;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CDS {
    pub key_tag: KeyTag,
    pub algorithm: DNSSecAlgorithm,
    pub digest_type: DigestAlgorithm,
    pub digest: Vec<u8>,
}

impl CDS {
    pub fn is_delete_signal(&self) -> bool {
        self.key_tag == 0 && self.algorithm == 0 && self.digest_type == 0 && self.digest.is_empty()
    }
}

impl RDataOperation for CDS {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if end - start < 4 {
            return Err(DnsError::format("truncated CDS rdata"));
        }
        Ok(CDS {
            key_tag: u16::from_be_bytes([message[start], message[start + 1]]),
            algorithm: message[start + 2],
            digest_type: message[start + 3],
            digest: message[start + 4..end].to_vec(),
        })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::super::NameCompressor,
    ) -> DnsResult<()> {
        self.encode_canonical(buf);
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.key_tag.to_be_bytes());
        buf.push(self.algorithm);
        buf.push(self.digest_type);
        buf.extend_from_slice(&self.digest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_delete_signal() {
        let raw = [0x00, 0x00, 0x00, 0x00];
        let cds = CDS::decode(&raw, 0, raw.len()).unwrap();
        assert!(cds.is_delete_signal());
    }
}
