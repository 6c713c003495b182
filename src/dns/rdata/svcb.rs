//! SVCB/HTTPS RDATA (RFC 9460): service binding parameters. Both types
//! share this RDATA shape; the outer RR type code is what distinguishes
//! them.

use std::collections::HashSet;

use super::RDataOperation;
use crate::dns::labels::DomainName;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvcParam {
    pub key: u16,
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SVCB {
    pub priority: u16,
    pub target: DomainName,
    /// Kept in ascending key order (RFC 9460 §2.2 wire-format requirement).
    pub params: Vec<SvcParam>,
}

impl SVCB {
    pub fn param(&self, key: u16) -> Option<&[u8]> {
        self.params.iter().find(|p| p.key == key).map(|p| p.value.as_slice())
    }
}

impl RDataOperation for SVCB {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if start + 2 > end {
            return Err(DnsError::format("truncated SVCB rdata"));
        }
        let priority = u16::from_be_bytes([message[start], message[start + 1]]);
        let mut offset = start + 2;
        // RFC 9460 §2.2: TargetName is never compressed.
        let target = DomainName::parse(message, &mut offset)?;

        let mut params = Vec::new();
        let mut seen = HashSet::new();
        while offset < end {
            if offset + 4 > end {
                return Err(DnsError::format("truncated SVCB parameter header"));
            }
            let key = u16::from_be_bytes([message[offset], message[offset + 1]]);
            let len = u16::from_be_bytes([message[offset + 2], message[offset + 3]]) as usize;
            offset += 4;
            if offset + len > end {
                return Err(DnsError::format("SVCB parameter value exceeds rdata"));
            }
            // RFC 9460 §2.2: "SvcParamKeys SHALL appear in increasing
            // numeric order" is a wire-format requirement on *encoders*;
            // decoders accept any order and reject only a true repeat.
            if !seen.insert(key) {
                return Err(DnsError::format(format!(
                    "duplicate SVCB parameter key {key}"
                )));
            }
            params.push(SvcParam {
                key,
                value: message[offset..offset + len].to_vec(),
            });
            offset += len;
        }
        if offset != end {
            return Err(DnsError::format("trailing bytes after SVCB parameters"));
        }
        params.sort_by_key(|p| p.key);

        Ok(SVCB {
            priority,
            target,
            params,
        })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        buf.extend_from_slice(&self.priority.to_be_bytes());
        self.target.encode_uncompressed(buf, false);
        for param in &self.params {
            buf.extend_from_slice(&param.key.to_be_bytes());
            if param.value.len() > u16::MAX as usize {
                return Err(DnsError::format("SVCB parameter value too large"));
            }
            buf.extend_from_slice(&(param.value.len() as u16).to_be_bytes());
            buf.extend_from_slice(&param.value);
        }
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.priority.to_be_bytes());
        self.target.canonical().encode_uncompressed(buf, true);
        for param in &self.params {
            buf.extend_from_slice(&param.key.to_be_bytes());
            buf.extend_from_slice(&(param.value.len() as u16).to_be_bytes());
            buf.extend_from_slice(&param.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_accepts_out_of_order_distinct_keys() {
        let mut raw = vec![0x00, 0x01, 0x00]; // priority=1, root target
        raw.extend([0x00, 0x03, 0x00, 0x00]); // key=3, len=0
        raw.extend([0x00, 0x01, 0x00, 0x00]); // key=1, out of order but distinct
        let svcb = SVCB::decode(&raw, 0, raw.len()).unwrap();
        // Stored in ascending key order regardless of wire order.
        assert_eq!(svcb.params.iter().map(|p| p.key).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn decode_rejects_duplicate_key() {
        let mut raw = vec![0x00, 0x01, 0x00]; // priority=1, root target
        raw.extend([0x00, 0x01, 0x00, 0x00]); // key=1, len=0
        raw.extend([0x00, 0x01, 0x00, 0x00]); // key=1 again: a true duplicate
        assert!(SVCB::decode(&raw, 0, raw.len()).is_err());
    }

    #[test]
    fn decode_encode_round_trip() {
        let mut raw = vec![0x00, 0x01, 0x00];
        raw.extend([0x00, 0x01, 0x00, 0x02, 0x00, 0x50]); // alpn-ish, 2-byte value
        let svcb = SVCB::decode(&raw, 0, raw.len()).unwrap();
        assert_eq!(svcb.priority, 1);
        assert_eq!(svcb.param(1), Some(&[0x00, 0x50][..]));
    }
}
