/*!
RRSIG RDATA (RFC 4034 §3): a 2 octet Type Covered field, a 1 octet
Algorithm field, a 1 octet Labels field, a 4 octet Original TTL field,
a 4 octet Signature Expiration field, a 4 octet Signature Inception
field, a 2 octet Key Tag, the Signer's Name, and the Signature.

```text
                     1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
|        Type Covered           |  Algorithm    |     Labels    |
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
|                         Original TTL                          |
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
|                      Signature Expiration                     |
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
|                      Signature Inception                      |
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
|            Key Tag            |   Signer's Name (variable)   /
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+                               /
/                                                               /
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/                            Signature                          /
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
```

The Labels field lets a validator reconstruct a wildcard-expanded
owner name (§3.1.3, RFC 4035 §5.3.2): it counts the labels in the
*original* RRSIG owner name, excluding the root label and excluding a
wildcard label if one was present.

Signer's Name is never compressed, and the Signature is raw bytes, not
base64 (base64 is presentation format only — RFC 4034 Appendix A.3).
*/

use super::algo::DNSSecAlgorithm;
use super::key_tag::KeyTag;
use crate::dns::labels::DomainName;
use crate::dns::rdata::RDataOperation;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RRSig {
    pub type_covered: u16,
    pub algorithm: DNSSecAlgorithm,
    pub labels: u8,
    pub origin_ttl: u32,
    pub sig_expiration: u32,
    pub sig_inception: u32,
    pub key_tag: KeyTag,
    pub signer_name: DomainName,
    pub signature: Vec<u8>,
}

impl RRSig {
    /// The RDATA fields that precede the Signature field, in their
    /// on-wire (uncompressed, as-signed) form — this is the prefix that
    /// gets hashed together with the covered RRset (RFC 4034 §3.1.8.1).
    pub fn signed_data_prefix(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(18 + 32);
        buf.extend_from_slice(&self.type_covered.to_be_bytes());
        buf.push(self.algorithm);
        buf.push(self.labels);
        buf.extend_from_slice(&self.origin_ttl.to_be_bytes());
        buf.extend_from_slice(&self.sig_expiration.to_be_bytes());
        buf.extend_from_slice(&self.sig_inception.to_be_bytes());
        buf.extend_from_slice(&self.key_tag.to_be_bytes());
        self.signer_name.canonical().encode_uncompressed(&mut buf, true);
        buf
    }
}

impl RDataOperation for RRSig {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if end - start < 18 {
            return Err(DnsError::format("truncated RRSIG rdata"));
        }
        let type_covered = u16::from_be_bytes([message[start], message[start + 1]]);
        let algorithm = message[start + 2];
        let labels = message[start + 3];
        let origin_ttl = u32::from_be_bytes(message[start + 4..start + 8].try_into().unwrap());
        let sig_expiration =
            u32::from_be_bytes(message[start + 8..start + 12].try_into().unwrap());
        let sig_inception =
            u32::from_be_bytes(message[start + 12..start + 16].try_into().unwrap());
        let key_tag = u16::from_be_bytes([message[start + 16], message[start + 17]]);

        let mut offset = start + 18;
        let signer_name = DomainName::parse(message, &mut offset)?;
        if offset > end {
            return Err(DnsError::format("RRSIG signer name overruns rdata"));
        }
        let signature = message[offset..end].to_vec();

        Ok(RRSig {
            type_covered,
            algorithm,
            labels,
            origin_ttl,
            sig_expiration,
            sig_inception,
            key_tag,
            signer_name,
            signature,
        })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::super::NameCompressor,
    ) -> DnsResult<()> {
        buf.extend_from_slice(&self.type_covered.to_be_bytes());
        buf.push(self.algorithm);
        buf.push(self.labels);
        buf.extend_from_slice(&self.origin_ttl.to_be_bytes());
        buf.extend_from_slice(&self.sig_expiration.to_be_bytes());
        buf.extend_from_slice(&self.sig_inception.to_be_bytes());
        buf.extend_from_slice(&self.key_tag.to_be_bytes());
        self.signer_name.encode_uncompressed(buf, false);
        buf.extend_from_slice(&self.signature);
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.signed_data_prefix());
        buf.extend_from_slice(&self.signature);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RRSig {
        RRSig {
            type_covered: 1,
            algorithm: 8,
            labels: 2,
            origin_ttl: 3600,
            sig_expiration: 1_700_000_000,
            sig_inception: 1_699_000_000,
            key_tag: 12345,
            signer_name: DomainName::from_text("example.com.").unwrap(),
            signature: vec![0xAA; 32],
        }
    }

    #[test]
    fn decode_encode_round_trip() {
        let rrsig = sample();
        let mut buf = Vec::new();
        let mut compressor = crate::dns::compress_list::NameCompressor::new();
        rrsig.encode(&mut buf, &mut compressor).unwrap();
        let parsed = RRSig::decode(&buf, 0, buf.len()).unwrap();
        assert_eq!(parsed, rrsig);
    }

    #[test]
    fn signer_name_is_never_compressed_against_preceding_data() {
        // preamble long enough that a naive compressor might find a
        // spurious suffix match; signer_name must still decode cleanly
        // since RRSig::encode never registers it with the compressor.
        let rrsig = sample();
        let mut buf = vec![0u8; 40];
        let mut compressor = crate::dns::compress_list::NameCompressor::new();
        let rdata_start = buf.len();
        rrsig.encode(&mut buf, &mut compressor).unwrap();
        let parsed = RRSig::decode(&buf, rdata_start, buf.len()).unwrap();
        assert_eq!(parsed.signer_name, rrsig.signer_name);
    }
}
