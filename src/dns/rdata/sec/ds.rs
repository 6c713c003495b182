/*!
DS RDATA (RFC 4034 §5): refers to a DNSKEY RR by key tag, algorithm,
and a digest of the DNSKEY RDATA. Appears only in the parent zone, at
the delegation point.

```text
                     1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
|           Key Tag             |  Algorithm    |  Digest Type  |
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/                            Digest                             /
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
```

digest = digest_algorithm(canonical owner name | DNSKEY RDATA)
*/

use super::algo::{DNSSecAlgorithm, DigestAlgorithm};
use super::key_tag::KeyTag;
use crate::dns::rdata::RDataOperation;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DS {
    pub key_tag: KeyTag,
    pub algorithm: DNSSecAlgorithm,
    pub digest_type: DigestAlgorithm,
    pub digest: Vec<u8>,
}

impl RDataOperation for DS {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if end - start < 4 {
            return Err(DnsError::format("truncated DS rdata"));
        }
        Ok(DS {
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
    fn decode_encode_round_trip() {
        let raw = [0x30, 0x39, 0x08, 0x02, 0xAA, 0xBB, 0xCC];
        let ds = DS::decode(&raw, 0, raw.len()).unwrap();
        assert_eq!(ds.key_tag, 0x3039);
        assert_eq!(ds.digest, vec![0xAA, 0xBB, 0xCC]);
        let mut out = Vec::new();
        ds.encode_canonical(&mut out);
        assert_eq!(out, raw);
    }
}
