/*!
ref: https://www.rfc-editor.org/rfc/rfc6891#section-6.1

The OPT pseudo-RR's CLASS and TTL fields are repurposed: CLASS carries
the requestor's UDP payload size, and TTL is split into
an 8 bit extended RCODE, 8 bit version, a DO bit, and a 15 bit Z field.
The RDATA itself is zero or more variable-length options:

```shell
                +0 (MSB)                            +1 (LSB)
     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
  0: |                          OPTION-CODE                          |
     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
  2: |                         OPTION-LENGTH                         |
     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
  4: /                          OPTION-DATA                          /
     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
```

RFC 6891 specifies zero or more such options per OPT record, decoded here
as a list rather than a single `(code, length, data)` triple.
*/

use super::RDataOperation;
use crate::error::{DnsError, DnsResult};

pub const DO_BIT: u32 = 0x0000_8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    pub code: u16,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OPT {
    pub options: Vec<OptionEntry>,
}

impl OPT {
    pub fn get(&self, code: u16) -> Option<&[u8]> {
        self.options
            .iter()
            .find(|o| o.code == code)
            .map(|o| o.data.as_slice())
    }
}

impl RDataOperation for OPT {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        let rdata = &message[start..end];
        let mut offset = 0;
        let mut options = Vec::new();
        while offset < rdata.len() {
            if offset + 4 > rdata.len() {
                return Err(DnsError::format("truncated EDNS option header"));
            }
            let code = u16::from_be_bytes([rdata[offset], rdata[offset + 1]]);
            let len = u16::from_be_bytes([rdata[offset + 2], rdata[offset + 3]]) as usize;
            offset += 4;
            if offset + len > rdata.len() {
                return Err(DnsError::format("EDNS option data exceeds rdata"));
            }
            options.push(OptionEntry {
                code,
                data: rdata[offset..offset + len].to_vec(),
            });
            offset += len;
        }
        Ok(OPT { options })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        for opt in &self.options {
            buf.extend_from_slice(&opt.code.to_be_bytes());
            if opt.data.len() > u16::MAX as usize {
                return Err(DnsError::format("EDNS option data too large"));
            }
            buf.extend_from_slice(&(opt.data.len() as u16).to_be_bytes());
            buf.extend_from_slice(&opt.data);
        }
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        for opt in &self.options {
            buf.extend_from_slice(&opt.code.to_be_bytes());
            buf.extend_from_slice(&(opt.data.len() as u16).to_be_bytes());
            buf.extend_from_slice(&opt.data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_multiple_options() {
        let raw = [
            0x00, 0x08, 0x00, 0x02, 0xAB, 0xCD, // NSID-style option
            0x00, 0x0a, 0x00, 0x00, // COOKIE with empty data
        ];
        let opt = OPT::decode(&raw, 0, raw.len()).unwrap();
        assert_eq!(opt.options.len(), 2);
        assert_eq!(opt.get(8), Some(&[0xAB, 0xCD][..]));
        assert_eq!(opt.get(10), Some(&[][..]));
    }
}
