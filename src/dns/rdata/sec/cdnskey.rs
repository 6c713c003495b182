//! CDNSKEY RDATA (RFC 7344): a child's proposed DNSKEY for the parent
//! to build a CDS/DS from. Identical wire shape to DNSKEY.

use super::algo::DNSSecAlgorithm;
use super::key_tag::{compute_key_tag, KeyTag};
use crate::dns::rdata::RDataOperation;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CDNSKEY {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: DNSSecAlgorithm,
    pub pub_key: Vec<u8>,
}

impl CDNSKEY {
    pub fn rdata_wire(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4 + self.pub_key.len());
        buf.extend_from_slice(&self.flags.to_be_bytes());
        buf.push(self.protocol);
        buf.push(self.algorithm);
        buf.extend_from_slice(&self.pub_key);
        buf
    }

    pub fn key_tag(&self) -> KeyTag {
        compute_key_tag(&self.rdata_wire())
    }

    pub fn is_delete_signal(&self) -> bool {
        self.flags == 0 && self.protocol == 3 && self.algorithm == 0 && self.pub_key.is_empty()
    }
}

impl RDataOperation for CDNSKEY {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if end - start < 4 {
            return Err(DnsError::format("truncated CDNSKEY rdata"));
        }
        let flags = u16::from_be_bytes([message[start], message[start + 1]]);
        let protocol = message[start + 2];
        let algorithm = message[start + 3];
        Ok(CDNSKEY {
            flags,
            protocol,
            algorithm,
            pub_key: message[start + 4..end].to_vec(),
        })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::super::NameCompressor,
    ) -> DnsResult<()> {
        buf.extend_from_slice(&self.rdata_wire());
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.rdata_wire());
    }
}
