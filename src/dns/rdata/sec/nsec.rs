/*!
NSEC RDATA (RFC 4034 §4): the next owner name in canonical zone order
that holds authoritative data or a delegation NS RRset, plus the set
of RR types present at this owner name. Forms a chain across a zone
that lets a resolver authenticate the *absence* of a name or type.

```text
                     1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/                      Next Domain Name                         /
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/                       Type Bit Maps                            /
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
```

Next Domain Name is never compressed. Type Bit Maps is the windowed
bitmap format shared with NSEC3 (see `super::encode_type_bitmaps`),
covering the full 16 bit type space rather than a bare `u32`.
*/

use super::{decode_type_bitmaps, encode_type_bitmaps};
use crate::dns::labels::DomainName;
use crate::dns::rdata::RDataOperation;
use crate::error::DnsResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NSEC {
    pub next_domain_name: DomainName,
    pub types: Vec<u16>,
}

impl NSEC {
    pub fn has_type(&self, typ: u16) -> bool {
        self.types.contains(&typ)
    }
}

impl RDataOperation for NSEC {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        let mut offset = start;
        let next_domain_name = DomainName::parse(message, &mut offset)?;
        let types = decode_type_bitmaps(&message[offset..end])?;
        Ok(NSEC {
            next_domain_name,
            types,
        })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::super::NameCompressor,
    ) -> DnsResult<()> {
        self.next_domain_name.encode_uncompressed(buf, false);
        buf.extend_from_slice(&encode_type_bitmaps(&self.types));
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        self.next_domain_name.canonical().encode_uncompressed(buf, true);
        buf.extend_from_slice(&encode_type_bitmaps(&self.types));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_encode_round_trip() {
        let nsec = NSEC {
            next_domain_name: DomainName::from_text("www.example.com.").unwrap(),
            types: vec![1, 15, 16, 28, 46, 47],
        };
        let mut buf = Vec::new();
        let mut compressor = crate::dns::compress_list::NameCompressor::new();
        nsec.encode(&mut buf, &mut compressor).unwrap();
        let parsed = NSEC::decode(&buf, 0, buf.len()).unwrap();
        assert_eq!(parsed, nsec);
        assert!(parsed.has_type(15));
        assert!(!parsed.has_type(2));
    }
}
