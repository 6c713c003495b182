/*!
DNSKEY RDATA (RFC 4034 §2): a 2 octet Flags field, a 1 octet Protocol
field, a 1 octet Algorithm field, and the Public Key field.

```text
                     1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
|              Flags            |    Protocol   |   Algorithm   |
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/                            Public Key                         /
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
```

The Public Key field holds the raw key material on the wire (RSA:
exponent-length-prefixed exponent + modulus per RFC 3110; DSA per RFC
2536; ECDSA/EdDSA: raw point/key bytes). It is never base64 on the
wire — base64 is only the zone-file presentation format (RFC 4034
Appendix A.3).
*/

use super::algo::DNSSecAlgorithm;
use super::key_tag::{compute_key_tag, KeyTag};
use crate::dns::rdata::RDataOperation;
use crate::error::{DnsError, DnsResult};

const ZONE_KEY_FLAG: u16 = 0b0000_0001_0000_0000;
const SECURE_ENTRY_POINT_FLAG: u16 = 0b0000_0000_0000_0001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DNSKEY {
    pub flags: u16,
    /// MUST be 3; RRs with any other value are invalid.
    pub protocol: u8,
    pub algorithm: DNSSecAlgorithm,
    pub pub_key: Vec<u8>,
}

impl DNSKEY {
    pub fn is_zone_key(&self) -> bool {
        self.flags & ZONE_KEY_FLAG != 0
    }

    pub fn is_secure_entry_point(&self) -> bool {
        self.flags & SECURE_ENTRY_POINT_FLAG != 0
    }

    /// The encoded RDATA, used both for key-tag computation and as
    /// input to the DS digest (RFC 4034 §5.1.4).
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
}

impl RDataOperation for DNSKEY {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if end - start < 4 {
            return Err(DnsError::format("truncated DNSKEY rdata"));
        }
        let flags = u16::from_be_bytes([message[start], message[start + 1]]);
        let protocol = message[start + 2];
        let algorithm = message[start + 3];
        if protocol != 3 {
            return Err(DnsError::format("DNSKEY protocol field must be 3"));
        }
        Ok(DNSKEY {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_key_and_sep_flags() {
        let key = DNSKEY {
            flags: ZONE_KEY_FLAG | SECURE_ENTRY_POINT_FLAG,
            protocol: 3,
            algorithm: 8,
            pub_key: vec![1, 2, 3],
        };
        assert!(key.is_zone_key());
        assert!(key.is_secure_entry_point());
    }

    #[test]
    fn decode_rejects_non_rfc_protocol() {
        let raw = [0x01, 0x00, 0x04, 0x08, 0xAA];
        assert!(DNSKEY::decode(&raw, 0, raw.len()).is_err());
    }

    #[test]
    fn decode_does_not_base64_the_public_key() {
        let raw = [0x01, 0x00, 0x03, 0x08, 0x00, 0x01, 0x02, 0x03];
        let key = DNSKEY::decode(&raw, 0, raw.len()).unwrap();
        assert_eq!(key.pub_key, vec![0x00, 0x01, 0x02, 0x03]);
    }
}
