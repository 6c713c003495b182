//! NSEC3PARAM RDATA (RFC 5155 §4): published at the zone apex, tells
//! authoritative servers which hash algorithm/iterations/salt the
//! zone's NSEC3 chain uses. Validators ignore it; it's not a proof of
//! anything by itself.

use crate::dns::rdata::RDataOperation;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NSEC3PARAM {
    pub hash_algorithm: u8,
    /// MUST be 0 on the wire; non-zero values mean "do not use this record".
    pub flags: u8,
    pub iterations: u16,
    pub salt: Vec<u8>,
}

impl RDataOperation for NSEC3PARAM {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        let rdata = &message[start..end];
        if rdata.len() < 5 {
            return Err(DnsError::format("truncated NSEC3PARAM rdata"));
        }
        let hash_algorithm = rdata[0];
        let flags = rdata[1];
        let iterations = u16::from_be_bytes([rdata[2], rdata[3]]);
        let salt_len = rdata[4] as usize;
        if 5 + salt_len != rdata.len() {
            return Err(DnsError::format("NSEC3PARAM salt length mismatch"));
        }
        Ok(NSEC3PARAM {
            hash_algorithm,
            flags,
            iterations,
            salt: rdata[5..].to_vec(),
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
        buf.push(self.hash_algorithm);
        buf.push(self.flags);
        buf.extend_from_slice(&self.iterations.to_be_bytes());
        buf.push(self.salt.len() as u8);
        buf.extend_from_slice(&self.salt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_encode_round_trip() {
        let p = NSEC3PARAM {
            hash_algorithm: 1,
            flags: 0,
            iterations: 50,
            salt: vec![0x11, 0x22],
        };
        let mut buf = Vec::new();
        p.encode_canonical(&mut buf);
        let parsed = NSEC3PARAM::decode(&buf, 0, buf.len()).unwrap();
        assert_eq!(parsed, p);
    }

    #[test]
    fn rejects_mismatched_salt_length() {
        let raw = [1u8, 0, 0, 10, 3, 0xAA]; // claims 3-byte salt, has 1
        assert!(NSEC3PARAM::decode(&raw, 0, raw.len()).is_err());
    }
}
